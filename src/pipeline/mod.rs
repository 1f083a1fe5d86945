// Pipeline orchestration
//
// - Orchestrator: drives save → extract → transcribe → translate and owns the
//   scratch-file cleanup contract
// - State: run states and progress observers
// - Video: the uploaded video handed to a run

pub mod orchestrator;
pub mod state;
pub mod video;

pub use orchestrator::*;
pub use state::*;
pub use video::*;
