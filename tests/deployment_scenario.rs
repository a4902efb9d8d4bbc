#![allow(clippy::unwrap_used)]

use muster::board::{Board, DeploymentStatus, Player, UnitData};
use muster::config::Rules;
use muster::error::SessionError;
use muster::geometry::{BaseSize, Pose, Zone};
use muster::math::Point2;
use muster::operations::{check_coherency, overlaps, CoherencyMember, PlacementRule};
use muster::session::{PlacementSession, SessionState};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Five 32 mm bases deployed in a row inside a 10" square zone, at the
/// default 40 world units per inch.
#[test]
fn five_model_row_deploys_and_straggler_breaks_coherency() {
    init_tracing();
    let rules = Rules::default();
    let mut board = Board::from_inches(44.0, 60.0, &rules);
    board.set_zone(
        Player::One,
        Zone::rect(Point2::new(0.0, 0.0), Point2::new(400.0, 400.0)),
    );
    let unit = board.add_unit(UnitData::new("Intercessor Squad", Player::One));
    for i in 0..5 {
        board.add_model(unit, format!("Intercessor {i}"), Some(BaseSize::round(32.0)));
    }

    let mut session = PlacementSession::new(rules.clone());
    session
        .begin(&board, unit, PlacementRule::Deployment)
        .unwrap();
    for x in [100.0, 160.0, 220.0, 280.0, 340.0] {
        assert!(session.place(Pose::at(x, 100.0)).unwrap().is_committed());
    }
    assert_eq!(session.state(), SessionState::AwaitingConfirmation);

    let shape = board.model(board.unit(unit).models[0]).shape;
    let poses: Vec<Pose> = session.slots().iter().map(|p| p.unwrap()).collect();
    for (i, a) in poses.iter().enumerate() {
        for b in &poses[i + 1..] {
            assert!(!overlaps(&shape, a, &shape, b));
        }
    }
    assert!(session.coherency().is_coherent);

    // Drag the fifth model well away from the others.
    assert!(session.reposition(4, Pose::at(280.0, 300.0)).unwrap().is_legal());
    let report = session.coherency();
    assert!(!report.is_coherent);
    assert_eq!(report.violating, vec![4]);
    assert!(matches!(
        session.confirm(&mut board),
        Err(SessionError::Incoherent { .. })
    ));

    assert!(session.reposition(4, Pose::at(340.0, 100.0)).unwrap().is_legal());
    session.confirm(&mut board).unwrap();
    assert_eq!(board.unit(unit).status, DeploymentStatus::Deployed);
    assert!(board.unit_coherency(unit, &rules).is_coherent);
}

/// The same check straight through the coherency operation, with no board.
#[test]
fn coherency_flags_only_the_moved_model() {
    let rules = Rules::default();
    let shape = muster::geometry::Shape::from_base(&BaseSize::round(32.0), &rules.scale());
    let positions = [
        (100.0, 100.0),
        (160.0, 100.0),
        (220.0, 100.0),
        (280.0, 100.0),
        (280.0, 300.0),
    ];
    let members: Vec<_> = positions
        .iter()
        .enumerate()
        .map(|(id, &(x, y))| CoherencyMember {
            id,
            shape,
            pose: Some(Pose::at(x, y)),
        })
        .collect();
    assert_eq!(check_coherency(&members, &rules).violating, vec![4]);
}

/// A second unit arriving from reserves may not land within 9" of the enemy.
#[test]
fn reserves_arrive_clear_of_the_enemy() {
    init_tracing();
    let rules = Rules::default();
    let mut board = Board::from_inches(44.0, 60.0, &rules);
    let enemy_unit = board.add_unit(UnitData::new("Boyz", Player::Two));
    let enemy = board.add_model(enemy_unit, "Boy", Some(BaseSize::round(32.0)));
    board.set_pose(enemy, Some(Pose::at(880.0, 1200.0)));

    let unit = board.add_unit(UnitData::new("Terminators", Player::One));
    board.set_status(unit, DeploymentStatus::InReserves);
    board.add_model(unit, "Terminator", Some(BaseSize::round(40.0)));

    let rule = PlacementRule::for_unit(board.unit(unit), true);
    assert_eq!(rule, PlacementRule::Reinforcement);
    let mut session = PlacementSession::new(rules);
    session.begin(&board, unit, rule).unwrap();

    // 8" (320 units) of edge gap is too close; 10" is fine.
    let close = 1200.0 - 16.0 / 25.4 * 40.0 - 20.0 / 25.4 * 40.0 - 320.0;
    assert!(!session.place(Pose::at(880.0, close)).unwrap().is_committed());
    assert!(session.place(Pose::at(880.0, close - 80.0)).unwrap().is_committed());
    session.confirm(&mut board).unwrap();
    assert!(board
        .units_with_status(DeploymentStatus::InReserves, None)
        .is_empty());
}
