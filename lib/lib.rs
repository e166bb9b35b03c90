/// Chess domain types.
pub mod chess;
/// Game session and turn control.
pub mod game;
/// Destination generation for every movement rule-set.
pub mod movegen;
/// Spell charges and the intents exchanged with a transport.
pub mod session;
/// The spells pieces may cast.
pub mod spell;
/// Temporary immobilization of pieces.
pub mod stun;
