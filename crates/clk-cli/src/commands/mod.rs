//! CLI subcommand implementations.

pub mod holidays;
pub mod notify;
pub mod remove;
pub mod report;
pub mod settings;
pub mod show;
pub mod start;
pub mod stop;
pub mod track;
pub mod view;

#[cfg(test)]
mod test_support;
