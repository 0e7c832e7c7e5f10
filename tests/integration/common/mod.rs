
#[allow(unused)]
pub use assertions::*;
#[allow(unused)]
pub use builders::*;
#[allow(unused)]
pub use setup::*;
