//! Signal evaluation: trap gate, decision pipeline and order intents.

pub mod context;
pub mod decision;
pub mod engine;
pub mod projection;
pub mod trap;

pub use context::{format_price, EvaluationContext};
pub use decision::*;
pub use engine::{EngineParams, Evaluation, SignalEngine};
pub use projection::project_outlook;
pub use trap::{detect_phantom_trap, TrapParams};
