pub mod locks;
pub mod retry;
