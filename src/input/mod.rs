mod reader;

pub use reader::{InputLine, LineError, LineReader};
