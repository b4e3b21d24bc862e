mod analysis;
mod complaint;
mod department;
mod risk;

pub use analysis::*;
pub use complaint::*;
pub use department::*;
pub use risk::*;
