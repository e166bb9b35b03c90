use crate::chess::{Color, Move, Played, Square};
use crate::game::{Game, IllegalMove};
use crate::spell::{Cast, IllegalCast, MalformedCast, Spell, Target};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, instrument};

/// The number of times each spell may be cast by one side.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, rename = "grimoire", default)]
pub struct Grimoire {
    pub summon: u8,
    pub transform: u8,
    pub slip: u8,
    pub empower: u8,
    pub exchange: u8,
    pub portal: u8,
    pub sacrifice: u8,
    pub cat: u8,
}

impl Default for Grimoire {
    fn default() -> Self {
        Grimoire {
            summon: 3,
            transform: 3,
            slip: 5,
            empower: 1,
            exchange: 3,
            portal: 3,
            sacrifice: 5,
            cat: 3,
        }
    }
}

impl Grimoire {
    /// The charges left for a [`Spell`].
    pub fn charges(&self, spell: Spell) -> u8 {
        let mut grimoire = *self;
        *grimoire.slot(spell)
    }

    /// Uses up one charge of a [`Spell`], if any is left.
    pub fn spend(&mut self, spell: Spell) -> Option<u8> {
        let slot = self.slot(spell);
        *slot = slot.checked_sub(1)?;
        Some(*slot)
    }

    fn slot(&mut self, spell: Spell) -> &mut u8 {
        match spell {
            Spell::Summon => &mut self.summon,
            Spell::Morph => &mut self.transform,
            Spell::MistStep => &mut self.slip,
            Spell::QueensGrace => &mut self.empower,
            Spell::Equilibrium => &mut self.exchange,
            Spell::Cylinder => &mut self.portal,
            Spell::BloodPact => &mut self.sacrifice,
            Spell::CatsHiss => &mut self.cat,
        }
    }
}

/// Prints the grimoire in [RON] notation.
///
/// [RON]: https://github.com/ron-rs/ron
impl fmt::Display for Grimoire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ron = ron::ser::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&ron)
    }
}

/// The reason why parsing [`Grimoire`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse grimoire")]
pub struct ParseGrimoireError(ron::de::SpannedError);

impl FromStr for Grimoire {
    type Err = ParseGrimoireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

/// A request to act upon a [`Match`], as exchanged between peers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, rename_all = "lowercase")]
pub enum Intent {
    Move {
        whence: Square,
        whither: Square,
    },
    Spell {
        spell: Spell,
        target: Target,
        #[serde(default)]
        source: Option<Square>,
    },
    Restart,
}

/// What happened as a result of an [`Intent`].
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Event {
    #[display(fmt = "played {}", _0)]
    Moved(Played),
    #[display(fmt = "cast {}", _0)]
    Cast(Spell),
    #[display(fmt = "restarted")]
    Restarted,
}

/// The reason why an [`Intent`] was rejected.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error, From)]
pub enum Rejected {
    #[display(fmt = "no charges of spell `{}` left", _0)]
    #[from(ignore)]
    Exhausted(#[error(not(source))] Spell),
    #[display(fmt = "{}", _0)]
    Malformed(MalformedCast),
    #[display(fmt = "{}", _0)]
    IllegalMove(IllegalMove),
    #[display(fmt = "{}", _0)]
    IllegalCast(IllegalCast),
}

/// A [`Game`] together with the spell charges of both sides.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash)]
pub struct Match {
    game: Game,
    grimoire: Grimoire,
    charges: [Grimoire; 2],
}

impl Match {
    /// Starts a match from a [`Game`], both sides holding the same [`Grimoire`].
    pub fn new(game: Game, grimoire: Grimoire) -> Self {
        Match {
            game,
            grimoire,
            charges: [grimoire; 2],
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// The charges left for a side.
    pub fn charges(&self, c: Color) -> &Grimoire {
        &self.charges[c as usize]
    }

    /// Applies an [`Intent`] on behalf of the side to move.
    ///
    /// A charge is spent only if the spell is actually cast.
    #[instrument(level = "debug", skip(self), err)]
    pub fn apply(&mut self, intent: Intent) -> Result<Event, Rejected> {
        match intent {
            Intent::Move { whence, whither } => {
                Ok(Event::Moved(self.game.play(Move(whence, whither))?))
            }

            Intent::Spell {
                spell,
                target,
                source,
            } => {
                let turn = self.game.turn();
                if self.charges(turn).charges(spell) == 0 {
                    return Err(Rejected::Exhausted(spell));
                }

                let cast = Cast::new(spell, target, source)?;
                self.game.cast(cast)?;

                let left = self.charges[turn as usize].spend(spell);
                debug!(%turn, %spell, ?left);
                Ok(Event::Cast(spell))
            }

            Intent::Restart => {
                self.game.reset();
                self.charges = [self.grimoire; 2];
                Ok(Event::Restarted)
            }
        }
    }

    /// Takes back the last ply if it was a standard move.
    pub fn undo(&mut self) -> Option<Move> {
        self.game.undo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_strategy::proptest;

    fn summon(sq: Square) -> Intent {
        Intent::Spell {
            spell: Spell::Summon,
            target: sq.into(),
            source: None,
        }
    }

    #[test]
    fn grimoire_deserializes_missing_fields_to_default() {
        assert_eq!("grimoire()".parse(), Ok(Grimoire::default()));
        assert_eq!(
            "grimoire(cat: 7)".parse(),
            Ok(Grimoire {
                cat: 7,
                ..Grimoire::default()
            })
        );
    }

    #[test]
    fn grimoire_rejects_unknown_spells() {
        assert!("grimoire(fireball: 1)".parse::<Grimoire>().is_err());
    }

    #[proptest]
    fn parsing_printed_grimoire_is_an_identity(g: Grimoire) {
        assert_eq!(g.to_string().parse(), Ok(g));
    }

    #[proptest]
    fn spending_uses_up_one_charge(mut g: Grimoire, s: Spell) {
        let before = g.charges(s);
        assert_eq!(g.spend(s), before.checked_sub(1));
        assert_eq!(g.charges(s), before.saturating_sub(1));
    }

    #[test]
    fn intents_deserialize_from_ron() {
        assert_eq!(
            ron::de::from_str(r#"move(whence: "e2", whither: "e4")"#),
            Ok(Intent::Move {
                whence: Square::E2,
                whither: Square::E4
            })
        );

        assert_eq!(
            ron::de::from_str(r#"spell(spell: "cat", target: "e5,f6", source: Some("e4"))"#),
            Ok(Intent::Spell {
                spell: Spell::CatsHiss,
                target: Target(Square::E5, Some(Square::F6)),
                source: Some(Square::E4)
            })
        );

        assert_eq!(ron::de::from_str("restart"), Ok(Intent::Restart));
    }

    #[proptest]
    fn serialized_intents_deserialize_to_themselves(i: Intent) {
        let ron = ron::ser::to_string(&i).unwrap();
        assert_eq!(ron::de::from_str(&ron), Ok(i));
    }

    #[test]
    fn casting_spends_a_charge_of_the_caster() -> Result<(), Rejected> {
        let mut m = Match::default();
        assert_eq!(m.apply(summon(Square::E4))?, Event::Cast(Spell::Summon));
        assert_eq!(m.charges(Color::White).charges(Spell::Summon), 2);
        assert_eq!(m.charges(Color::Black).charges(Spell::Summon), 3);
        Ok(())
    }

    #[test]
    fn exhausted_spells_are_rejected() -> Result<(), Rejected> {
        let mut m = Match::default();
        for (w, b) in [(Square::E4, Square::E5), (Square::D4, Square::D5), (Square::C4, Square::C5)] {
            m.apply(summon(w))?;
            m.apply(summon(b))?;
        }

        let before = m.clone();
        assert_eq!(
            m.apply(summon(Square::F4)),
            Err(Rejected::Exhausted(Spell::Summon))
        );
        assert_eq!(m, before);
        Ok(())
    }

    #[proptest]
    fn rejected_spells_spend_no_charges(i: Intent) {
        let mut m = Match::default();
        let before = m.clone();
        if m.apply(i).is_err() {
            assert_eq!(m, before);
        }
    }

    #[test]
    fn malformed_spells_are_rejected() {
        let mut m = Match::default();
        assert_eq!(
            m.apply(Intent::Spell {
                spell: Spell::MistStep,
                target: Square::C3.into(),
                source: None
            }),
            Err(Rejected::Malformed(MalformedCast::MissingSource(
                Spell::MistStep
            )))
        );
    }

    #[test]
    fn restart_restores_position_and_charges() -> Result<(), Rejected> {
        let grimoire = Grimoire {
            summon: 1,
            ..Grimoire::default()
        };

        let mut m = Match::new(Game::default(), grimoire);
        m.apply(summon(Square::E4))?;
        m.apply(Intent::Move {
            whence: Square::E7,
            whither: Square::E5,
        })?;

        assert_eq!(m.apply(Intent::Restart)?, Event::Restarted);
        assert_eq!(m, Match::new(Game::default(), grimoire));
        Ok(())
    }

    #[test]
    fn moves_are_played_on_the_game() -> Result<(), Rejected> {
        let mut m = Match::default();
        let event = m.apply(Intent::Move {
            whence: Square::G1,
            whither: Square::F3,
        })?;

        assert_eq!(event.to_string(), "played g1f3");
        assert_eq!(m.undo(), Some(Move(Square::G1, Square::F3)));
        assert_eq!(m, Match::default());
        Ok(())
    }
}
