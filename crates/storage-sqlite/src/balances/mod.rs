mod model;
mod repository;

pub use model::{BalanceObservationDB, NewBalanceObservationDB, WalletBalanceDB};
pub use repository::WalletBalanceRepository;
