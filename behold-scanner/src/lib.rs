pub mod classifier;
pub mod encoding;
pub mod error;
pub mod prober;
pub mod result;
pub mod site;

pub use classifier::{ProbeOutcome, ProbeResponse, classify};
pub use encoding::TextDecoder;
pub use error::{ClassifyError, ScanError, SiteError};
pub use prober::{ProgressCallback, Prober, ResultCallback, partition};
pub use result::ProbeResult;
pub use site::{ClassificationMode, ErrorIndicator, IndicatorMeaning, SiteDescriptor};
