//! The dynamic value model, typecast lattice, arena-indexed symbol tables,
//! and tree-walking evaluator for LOLCODE programs.

pub mod interpreter;
pub mod io;
pub mod scope;
pub mod value;

pub use interpreter::Interpreter;
pub use io::{BufferSink, InputProvider, PrintSink, ScriptedInput, StdinProvider, StdoutSink};
pub use scope::{Context, ContextArena, ContextId};
pub use value::{FunctionData, Number, Value};
