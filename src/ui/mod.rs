pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{completed, error, header, section, skipped_link, status, success};
pub use table::{stats_table, TableBuilder};
pub use theme::{theme, Theme};
