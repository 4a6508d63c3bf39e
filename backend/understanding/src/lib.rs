pub mod identifier;
pub mod interpreter;
pub mod mock;
pub mod session;
pub mod vision;

pub use identifier::{Identification, PlantIdentifier};
pub use interpreter::interpret;
pub use mock::MockProvider;
pub use session::{IdentificationSession, RequestTicket, SessionSnapshot};
pub use vision::{GeminiProvider, OpenAiProvider};
