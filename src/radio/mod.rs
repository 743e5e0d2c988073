pub mod driver;
pub mod hal;
pub mod registers;
pub mod transport;

pub use driver::{SeekDirection, Si4703Driver};
pub use registers::{RegisterImage, RegisterSnapshot, Status};
pub use transport::RegisterTransport;
