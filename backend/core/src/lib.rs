pub mod error;
pub mod prompt;
pub mod traits;
pub mod types;

pub use error::FloraError;
pub use prompt::IDENTIFICATION_PROMPT;
pub use traits::{VisionProvider, VisionRequest};
pub use types::{ImageInput, PlantRecord, RawModelResponse};
