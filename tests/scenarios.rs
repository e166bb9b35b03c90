use anyhow::Error as Anyhow;
use lib::chess::{Board, Color, Move, Outcome, Piece, Role, Square};
use lib::game::{Game, IllegalMove};
use lib::session::{Intent, Match};
use lib::spell::{Cast, IllegalCast, Spell, Target};
use proptest::{collection::vec, option, prelude::*, sample::select};
use test_strategy::proptest;

fn square() -> impl Strategy<Value = Square> {
    select(Square::ALL.to_vec())
}

fn intent() -> impl Strategy<Value = Intent> {
    prop_oneof![
        8 => (square(), square()).prop_map(|(whence, whither)| Intent::Move { whence, whither }),
        4 => (
            select(Spell::ALL.to_vec()),
            square(),
            option::of(square()),
            option::of(square())
        )
            .prop_map(|(spell, t, stun, source)| Intent::Spell {
                spell,
                target: Target(t, stun),
                source
            }),
    ]
}

#[test]
fn summoning_is_restricted_to_the_middle_ranks() -> Result<(), Anyhow> {
    let mut game: Game = "4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse()?;
    let before = game.clone();

    assert_eq!(
        game.cast(Cast::Summon(Square::E2)),
        Err(IllegalCast::OutsideSummoningRanks(Square::E2))
    );
    assert_eq!(game, before);

    game.cast(Cast::Summon(Square::E4))?;
    assert_eq!(game.board()[Square::E4], Some(Piece(Color::White, Role::Pawn)));

    Ok(())
}

#[test]
fn exchange_swaps_rooks_across_the_board() -> Result<(), Anyhow> {
    let mut game: Game = "4k2r/8/8/8/8/8/8/R3K3 w - - 0 1".parse()?;
    game.cast(Cast::Equilibrium(Square::A1, Square::H8))?;

    assert_eq!(game.board()[Square::H8], Some(Piece(Color::White, Role::Rook)));
    assert_eq!(game.board()[Square::A1], Some(Piece(Color::Black, Role::Rook)));
    assert_eq!(game.turn(), Color::Black);

    Ok(())
}

#[test]
fn sacrifice_removes_both_pieces() -> Result<(), Anyhow> {
    let mut game: Game = "4k3/3p4/8/8/8/8/8/3QK3 w - - 0 1".parse()?;
    game.cast(Cast::BloodPact(Square::D1, Square::D7))?;

    assert_eq!(game.board()[Square::D1], None);
    assert_eq!(game.board()[Square::D7], None);

    Ok(())
}

#[test]
fn cat_stuns_an_adjacent_enemy_for_one_ply() -> Result<(), Anyhow> {
    let mut game: Game = "4k3/8/8/5p2/4N3/8/8/4K3 w - - 0 1".parse()?;
    let before = game.clone();

    assert_eq!(
        game.cast(Cast::CatsHiss(Square::E4, Square::D4, Square::F5)),
        Err(IllegalCast::Unreachable(Square::D4))
    );

    assert_eq!(
        game.cast(Cast::CatsHiss(Square::E4, Square::E5, Square::E6)),
        Err(IllegalCast::NotStunnable(Square::E6))
    );

    assert_eq!(game, before);

    game.cast(Cast::CatsHiss(Square::E4, Square::E5, Square::F5))?;
    assert_eq!(game.board()[Square::E5], Some(Piece(Color::White, Role::Knight)));
    assert!(game.is_stunned(Square::F5));

    assert_eq!(
        game.play(Move(Square::F5, Square::F4)),
        Err(IllegalMove::Stunned(Square::F5))
    );

    game.play(Move(Square::E8, Square::E7))?;
    assert!(!game.is_stunned(Square::F5));

    game.play(Move(Square::E1, Square::E2))?;
    game.play(Move(Square::F5, Square::F4))?;
    assert_eq!(game.board()[Square::F4], Some(Piece(Color::Black, Role::Pawn)));

    Ok(())
}

#[test]
fn capturing_the_king_wins_the_game() -> Result<(), Anyhow> {
    let mut game: Game = "7k/8/8/8/8/8/8/4K2R w - - 0 1".parse()?;
    assert_eq!(game.outcome(), None);

    game.play(Move(Square::H1, Square::H8))?;
    assert_eq!(game.outcome(), Some(Outcome::Regicide(Color::White)));
    assert_eq!(game.outcome().and_then(|o| o.winner()), Some(Color::White));

    assert_eq!(
        game.play(Move(Square::A1, Square::A2)),
        Err(IllegalMove::GameOver)
    );

    Ok(())
}

#[test]
fn a_portal_may_capture_the_king_across_the_edge() -> Result<(), Anyhow> {
    let mut game: Game = "8/8/8/R3P2k/8/8/8/K7 w - - 0 1".parse()?;
    game.cast(Cast::Cylinder(Square::A5, Square::H5))?;
    assert_eq!(game.outcome(), Some(Outcome::Regicide(Color::White)));
    Ok(())
}

#[test]
fn a_cat_may_capture_the_king() -> Result<(), Anyhow> {
    let mut game: Game = "8/8/8/4kp2/4N3/8/8/K7 w - - 0 1".parse()?;
    game.cast(Cast::CatsHiss(Square::E4, Square::E5, Square::F5))?;

    assert_eq!(game.board()[Square::E5], Some(Piece(Color::White, Role::Knight)));
    assert_eq!(game.outcome(), Some(Outcome::Regicide(Color::White)));
    assert_eq!(
        game.cast(Cast::Summon(Square::C4)),
        Err(IllegalCast::GameOver)
    );

    Ok(())
}

#[test]
fn bare_kings_may_still_cast() -> Result<(), Anyhow> {
    let mut session = Match::new("4k3/8/8/8/8/8/8/4K3 w - - 0 1".parse()?, Default::default());
    assert_eq!(session.game().outcome(), Some(Outcome::DrawByInsufficientMaterial));

    session.apply(Intent::Spell {
        spell: Spell::Summon,
        target: Square::E4.into(),
        source: None,
    })?;

    session.apply(Intent::Move {
        whence: Square::E8,
        whither: Square::D8,
    })?;

    assert_eq!(session.game().board()[Square::E4], Some(Piece(Color::White, Role::Pawn)));
    Ok(())
}

#[test]
fn portal_wraps_rooks_around_the_board_edge() -> Result<(), Anyhow> {
    let game: Game = "7k/8/8/8/R3P3/8/8/7K w - - 0 1".parse()?;
    let portal = game.destinations(Square::A4, Some((Spell::Cylinder, Square::A4)));
    let orthodox = game.destinations(Square::A4, None);

    assert!(portal.contains(Square::H4));
    assert!(!orthodox.contains(Square::H4));
    assert_eq!(portal.len(), 13);

    Ok(())
}

#[proptest]
fn turns_alternate_and_rejections_change_nothing(
    #[strategy(vec(intent(), 1..64))] intents: Vec<Intent>,
) {
    let mut session = Match::default();

    for i in intents {
        let before = session.clone();
        let turn = before.game().turn();
        let ply = before.game().ply();

        match session.apply(i) {
            Ok(_) => {
                assert_eq!(session.game().turn(), !turn);
                assert_eq!(session.game().ply(), ply + 1);
            }

            Err(_) => assert_eq!(session, before),
        }

        let board = session.game().board();
        assert_eq!(board.iter().count(), board.occupied().len());

        if session != before {
            assert_eq!(board.occupied().len(), occupancy(before.game().board(), i));
        }

        let kings = board.iter().filter(|(_, p)| p.role() == Role::King);
        assert!(kings.count() <= 2);
    }
}

/// The number of pieces left on the board after `intent` succeeds.
fn occupancy(before: &Board, intent: Intent) -> usize {
    let n = before.occupied().len();
    let captures = |sq: Square| n - usize::from(before[sq].is_some());

    match intent {
        Intent::Move { whither, .. } => captures(whither),
        Intent::Spell { spell, target: Target(t, _), .. } => match spell {
            Spell::Summon => n + 1,
            Spell::BloodPact => n - 2,
            Spell::Morph | Spell::MistStep | Spell::Equilibrium => n,
            Spell::QueensGrace | Spell::Cylinder | Spell::CatsHiss => captures(t),
        },
        Intent::Restart => Board::default().occupied().len(),
    }
}
