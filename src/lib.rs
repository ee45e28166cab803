pub mod amount;
pub mod change;
pub mod coins;
pub mod config;
pub mod csv;
pub mod engine;
pub mod inventory;
pub mod model;
pub mod notify;

pub use amount::Amount;
pub use coins::{CoinCounts, Denomination};
pub use config::{StartupConfig, TieBreak};
pub use engine::{Engine, VendError};
pub use model::{Command, Product, ProductKey};
pub use notify::{Event, Notifier, StdoutNotifier};
