//! crowdsale-deploy: staged deployment of the GameloftToken crowdsale.
//!
//! Each stage is a separate process run that hands state to the next through
//! JSON files in a data directory:
//!
//!   accounts: persist the node's first signers to `account.json`
//!   deploy-token: deploy GameloftToken from `gameloftToken.json`
//!   deploy-sale: deploy CrowdSale from `crowdsale.json`, move the supply in
//!   set-round: register every pool in `round.json`, in file order
//!   set-investor: flag investors for a round (`investor.json` or a preset)
//!
//! `deployedAddresses.json` carries the contract addresses plus a versioned
//! stage tag, so running a stage out of order is refused up front.
//! [`bootstrap::deploy_fresh`] runs the token and sale deployment in-process
//! for tests without touching that file.

pub mod bootstrap;
pub mod error;
pub mod inputs;
pub mod settings;
pub mod stages;
pub mod store;
pub mod tasks;

pub use error::{Error, Result};
