//! Form and wizard state

mod forms;
mod wizard;

pub use forms::*;
pub use wizard::*;
