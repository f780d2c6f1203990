use crate::libs::channel::Channel;
use prettytable::{row, Table};
use std::error::Error;

pub struct View {}

impl View {
    pub fn status(
        installed: Channel,
        desired: Channel,
        release_tag: Option<String>,
        release_date: Option<String>,
        server_path: Option<String>,
        managed_binary: String,
    ) -> Result<(), Box<dyn Error>> {
        let mut table = Table::new();

        table.add_row(row!["INSTALLED CHANNEL", installed]);
        table.add_row(row!["DESIRED CHANNEL", desired]);
        table.add_row(row!["RELEASE TAG", release_tag.unwrap_or_else(|| "-".to_string())]);
        table.add_row(row!["RELEASE DATE", release_date.unwrap_or_else(|| "-".to_string())]);
        table.add_row(row!["SERVER PATH", server_path.unwrap_or_else(|| "(managed)".to_string())]);
        table.add_row(row!["MANAGED BINARY", managed_binary]);
        table.printstd();

        Ok(())
    }
}
