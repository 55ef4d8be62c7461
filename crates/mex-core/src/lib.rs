mod errors;
pub use errors::{LabelError, ScrapeError};

mod scraper;
pub use scraper::{AppFilter, MarathonScraper, Scraper, Snapshot};

mod labels;
pub use labels::{LabelConfig, RESERVED_LABELS};
