pub mod checkout;
pub mod common;
pub mod init;
pub mod list;
pub mod pull;
pub mod push;
pub mod watch;

pub use checkout::Checkout;
pub use init::Init;
pub use list::List;
pub use pull::Pull;
pub use push::Push;
pub use watch::Watch;
