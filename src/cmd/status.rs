use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::*;

use crate::{cli::StatusOptions, metadata};

pub struct StatusCommand {
    #[allow(unused)]
    pub status_options: StatusOptions,
}

#[async_trait]
impl super::Command for StatusCommand {
    async fn run(&self) -> Result<()> {
        let metadata = metadata::load(Path::new(metadata::METADATA_PATH)).await?;

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Build Version", "Kernel Version"]);

        table.add_row(vec![
            Cell::new(metadata.version.as_str()),
            match metadata.kernel_version.as_deref() {
                Some(kernel_version) => Cell::new(kernel_version),
                None => Cell::new("<never updated>").fg(Color::DarkGrey),
            },
        ]);

        println!("{table}");

        Ok(())
    }
}
