pub mod lexer;
pub mod parser;
pub mod environment;
pub mod analyzer;
pub mod eval;
pub mod utils;

pub mod prelude {
    pub use crate::{
        analyzer::prelude::*,
        environment::prelude::*,
        eval::prelude::*,
        lexer::prelude::*,
        parser::prelude::*,
        utils::prelude::*,
    };
}
