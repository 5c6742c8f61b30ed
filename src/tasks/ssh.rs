use std::sync::Arc;

use anyhow::Result;

use super::{Context, Policy, Task, TaskResult, converge};
use crate::resources::ssh::{
    SshAgentConfigResource, SshKeyResource, add_to_keychain, copy_public_key,
};

/// Generate an SSH key, register it with the agent and copy the public half.
#[derive(Debug)]
pub struct ConfigureSshKey;

impl Task for ConfigureSshKey {
    fn name(&self) -> &'static str {
        "Configure SSH key"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.executor.which("ssh-keygen")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let ssh = &ctx.config.ssh;
        let key = SshKeyResource::new(
            ssh.key_path.clone(),
            ctx.config.identity.email.clone(),
            ssh.overwrite,
            Arc::clone(&ctx.executor),
        );
        converge(ctx, [key], &Policy::enforce("generate"))?;

        let agent = SshAgentConfigResource::new(ssh.config_path.clone(), ssh.key_path.clone());
        let result = converge(ctx, [agent], &Policy::enforce("update"))?;

        let public_key = ssh.public_key_path();
        if ctx.dry_run {
            ctx.log.dry_run(&format!(
                "would add {} to the keychain",
                ssh.key_path.display()
            ));
            ctx.log.dry_run(&format!(
                "would copy {} to the clipboard",
                public_key.display()
            ));
            return Ok(result);
        }

        add_to_keychain(&*ctx.executor, &ssh.key_path)?;
        copy_public_key(&*ctx.executor, &public_key)?;
        ctx.log
            .info(&format!("copied {} to the clipboard", public_key.display()));
        Ok(result)
    }
}
