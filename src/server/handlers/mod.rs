pub mod bikes;
pub mod rides;
pub mod wallets;
