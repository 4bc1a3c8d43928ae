use anyhow::Result;
use async_trait::async_trait;

pub mod build;
pub mod status;
pub mod update;

#[async_trait]
pub trait Command {
    async fn run(&self) -> Result<()>;
}

pub trait IntoCommand {
    fn into_command(self) -> Box<dyn Command>;
}

impl IntoCommand for crate::cli::Command {
    fn into_command(self) -> Box<dyn Command> {
        match self {
            crate::cli::Command::Build(build_options) => {
                Box::new(build::BuildCommand { build_options })
            }
            crate::cli::Command::Update(update_options) => {
                Box::new(update::UpdateCommand { update_options })
            }
            crate::cli::Command::Status(status_options) => {
                Box::new(status::StatusCommand { status_options })
            }
        }
    }
}
