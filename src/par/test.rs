use super::*;
use crate::tricks::DdTable;
use proptest::prelude::*;
use Seat::*;
use Strain::*;

/// Tricks for (strain, declarers) pairs, `default` elsewhere
fn tricks(default: u8, overrides: &[(Strain, &[Seat], u8)]) -> TrickTable {
    let table = DdTable::from_fn(|strain, seat| {
        overrides
            .iter()
            .find(|(s, seats, _)| *s == strain && seats.contains(&seat))
            .map_or(default, |&(_, _, tricks)| tricks)
    });
    TrickTable::new(&table).expect("Valid tricks")
}

fn calls(calls: &[&str]) -> Vec<Call> {
    calls
        .iter()
        .map(|call| call.parse().expect("Valid call"))
        .collect()
}

fn scores(board: u32, table: TrickTable, auction: &[&str]) -> Vec<i32> {
    AuctionParSimulator::run(Board::new(board), table, &calls(auction))
        .expect("Legal auction")
        .iter()
        .map(|record| record.score)
        .collect()
}

const EW: &[Seat] = &[East, West];
const NS: &[Seat] = &[North, South];

#[test]
fn flat_boards() {
    assert_eq!(scores(1, tricks(6, &[]), &[]), [0]);
    assert_eq!(scores(1, tricks(7, &[]), &[]), [90]);
    assert_eq!(scores(2, tricks(7, &[]), &[]), [-90]);
}

#[test]
fn game_against_sacrifice_first_hand() {
    let s4 = [(Hearts, &[South][..], 10), (Clubs, &[North][..], 11)];
    assert_eq!(scores(1, tricks(0, &s4), &[]), [420]);

    let s5 = [s4[0], s4[1], (Spades, EW, 8)];
    assert_eq!(scores(1, tricks(0, &s5), &[]), [400]);
}

#[test]
fn game_against_sacrifice_third_hand() {
    let table = |hearts, clubs, spades| {
        tricks(
            0,
            &[
                (Hearts, &[South], hearts),
                (Clubs, &[North], clubs),
                (Spades, EW, spades),
            ],
        )
    };

    assert_eq!(scores(3, table(10, 11, 8), &[]), [420]);
    assert_eq!(scores(3, table(10, 11, 9), &[]), [400]);
    assert_eq!(scores(3, table(10, 10, 9), &[]), [200]);
    assert_eq!(scores(3, table(9, 10, 9), &[]), [130]);
    assert_eq!(scores(3, table(9, 10, 8), &[]), [140]);
}

#[test]
fn partscore_battles() {
    let table = tricks(
        0,
        &[(Hearts, &[South], 9), (Clubs, &[North], 10), (Spades, EW, 8)],
    );
    assert_eq!(scores(1, table, &[]), [130]);

    let table = tricks(
        0,
        &[(Hearts, &[East], 9), (Clubs, &[West], 10), (Spades, NS, 8)],
    );
    assert_eq!(scores(1, table, &[]), [-130]);
}

#[test]
fn wrong_declarer_bids_first() {
    let table = tricks(0, &[(Hearts, &[South], 10), (Clubs, &[North], 11)]);
    assert_eq!(scores(1, table, &["1H"]), [420, 400]);

    let table = tricks(0, &[(Hearts, &[South], 10), (Clubs, &[North], 10)]);
    assert_eq!(scores(1, table, &["1H"]), [420, 130]);
}

#[test]
fn partner_bids_the_fallback_strain_first() {
    let table = tricks(
        0,
        &[
            (Hearts, &[South], 10),
            (Clubs, &[North], 11),
            (Clubs, &[South], 9),
        ],
    );
    assert_eq!(scores(1, table, &["1H", "P", "2C"]), [420, 400, 400, 110]);

    let table = tricks(
        0,
        &[
            (Hearts, &[South], 10),
            (Clubs, &[North], 11),
            (Clubs, &[South], 7),
        ],
    );
    assert_eq!(scores(1, table, &["1H", "P", "2C"]), [420, 400, 400, -100]);
}

#[test]
fn records_render_calls_and_contracts() {
    let table = tricks(
        0,
        &[
            (Hearts, &[South], 10),
            (Clubs, &[North], 11),
            (Clubs, &[South], 7),
        ],
    );
    let records = AuctionParSimulator::run(Board::new(1), table, &calls(&["1H", "P", "2C"]))
        .expect("Legal auction");
    let lines: Vec<_> = records.iter().map(ToString::to_string).collect();

    assert_eq!(
        lines,
        [
            "Pre-bid: +420 4H by S =",
            "1H by N: +400 5C by N =",
            "P by E: +400 5C by N =",
            "2C by S: -100 2CX by S -1",
        ]
    );
}

#[test]
fn unchallenged_real_contract_is_par() {
    let table = tricks(
        0,
        &[
            (Hearts, &[South], 10),
            (Clubs, &[North], 11),
            (Clubs, &[South], 9),
        ],
    );
    let records = AuctionParSimulator::run(Board::new(1), table, &calls(&["1H", "P", "2C"]))
        .expect("Legal auction");

    // Raising to 3C scores the same and is not a new par contract
    assert_eq!(records[3].to_string(), "2C by S: +110 2C by S +1");
}

#[test]
fn equal_contracts_in_different_strains_tie() {
    let table = tricks(0, &[(Hearts, &[South], 10), (Spades, &[North], 10)]);
    let simulator = AuctionParSimulator::new(Board::new(1), table);

    assert_eq!(simulator.pre_bid().to_string(), "Pre-bid: +420 4H by S =, 4S by N =");
    assert_eq!(simulator.state().ties().len(), 2);
    assert_eq!(
        simulator.state().best().map(|best| best.contract),
        Some(Contract::new(4, Spades, Penalty::None))
    );
}

#[test]
fn four_passes_pass_the_board_out() {
    let table = tricks(0, &[(Hearts, &[South], 10), (Clubs, &[North], 11)]);
    let mut simulator = AuctionParSimulator::new(Board::new(1), table);

    for _ in 0..4 {
        simulator.push(Call::Pass).expect("Legal pass");
    }

    assert!(simulator.is_finished());
    let last = &simulator.records()[4];
    assert_eq!(last.score, 0);
    assert!(last.contracts.is_empty());
    assert_eq!(last.to_string(), "P by W: +0 passed out");
}

#[test]
fn passing_side_settles_when_its_pass_ends_the_auction() {
    let table = tricks(0, &[(Clubs, NS, 7), (Notrump, NS, 9)]);
    let records = AuctionParSimulator::run(Board::new(1), table, &calls(&["1C", "P", "P"]))
        .expect("Legal auction");

    // West cannot improve, and North-South get no chance to reach 3NT
    assert_eq!(records[0].to_string(), "Pre-bid: +400 3NT by NS =");
    assert_eq!(records[3].to_string(), "P by S: +70 1C by N =");
}

#[test]
fn illegal_calls_change_nothing() {
    let table = tricks(7, &[]);
    let mut simulator = AuctionParSimulator::new(Board::new(1), table);
    simulator.push("1NT".parse().expect("Valid call")).expect("Legal bid");
    let before = simulator.clone();

    assert_eq!(
        simulator.push(Call::Bid(Bid::new(1, Spades))),
        Err(IllegalCall::Insufficient {
            bid: Bid::new(1, Spades),
            contract: Bid::new(1, Notrump),
        })
    );
    assert_eq!(simulator.push(Call::Redouble), Err(IllegalCall::InvalidRedouble));
    assert_eq!(simulator.records(), before.records());
    assert_eq!(simulator.auction(), before.auction());
    assert_eq!(simulator.table(), before.table());

    for call in ["P", "P", "P"] {
        simulator.push(call.parse().expect("Valid call")).expect("Legal pass");
    }
    assert_eq!(simulator.push(Call::Pass), Err(IllegalCall::AfterEnd));
    assert_eq!(simulator.records().len(), 5);
}

#[test]
fn first_bid_of_a_strain_fixes_the_declarer() {
    let table = tricks(0, &[(Hearts, &[South], 10), (Clubs, &[North], 11)]);
    let mut simulator = AuctionParSimulator::new(Board::new(1), table);
    simulator.push(Call::Bid(Bid::new(1, Hearts))).expect("Legal bid");

    assert_eq!(simulator.declarers().get(Partnership::NS, Hearts), Some(North));
    assert_eq!(simulator.declarers().get(Partnership::EW, Hearts), None);
    assert_eq!(
        simulator.table().entries(Hearts, Partnership::NS),
        [(Declarer::Seat(North), 0)]
    );
}

#[test]
fn raised_contract_stays_with_the_first_bidder() {
    let table = tricks(
        0,
        &[
            (Hearts, &[South], 10),
            (Clubs, &[North], 11),
            (Clubs, &[South], 9),
        ],
    );
    let records = AuctionParSimulator::run(
        Board::new(1),
        table,
        &calls(&["1H", "P", "2C", "P", "3C"]),
    )
    .expect("Legal auction");

    assert_eq!(records[5].to_string(), "3C by N: +110 3C by S =");
}

#[test]
fn doubled_real_contract_scores_its_penalty() {
    let table = tricks(6, &[]);
    let records = AuctionParSimulator::run(
        Board::new(1),
        table,
        &calls(&["1S", "X", "P", "P", "P"]),
    )
    .expect("Legal auction");

    let last = &records[5];
    assert_eq!(last.score, -100);
    assert_eq!(last.to_string(), "P by N: -100 1SX by N -1");
}

#[test]
fn contracts_render_their_result() {
    let vulnerability = Vulnerability::NONE;
    let made = ParContract::new(
        Contract::new(5, Clubs, Penalty::None),
        Declarer::Seat(North),
        12,
        vulnerability,
    );
    assert_eq!(made.to_string(), "5C by N +1");
    assert_eq!(made.score, 420);

    let sacrifice = ParContract::new(
        Contract::new(4, Spades, Penalty::Doubled),
        Declarer::Side(Partnership::EW),
        8,
        vulnerability,
    );
    assert_eq!(sacrifice.to_string(), "4SX by EW -2");
    assert_eq!(sacrifice.score, 300);
    assert_eq!(sacrifice.score_for(Partnership::EW), -300);
}

#[test]
fn opening_levels() {
    assert_eq!(opening_level(Clubs, 11), 5);
    assert_eq!(opening_level(Diamonds, 10), 1);
    assert_eq!(opening_level(Hearts, 10), 4);
    assert_eq!(opening_level(Spades, 9), 1);
    assert_eq!(opening_level(Notrump, 9), 3);
    assert_eq!(opening_level(Clubs, 12), 6);
    assert_eq!(opening_level(Notrump, 13), 7);

    let floor = Some(Bid::new(4, Hearts));
    assert_eq!(cheapest_bid(Spades, 8, floor), Some(Bid::new(4, Spades)));
    assert_eq!(cheapest_bid(Clubs, 11, floor), Some(Bid::new(5, Clubs)));
    assert_eq!(cheapest_bid(Hearts, 10, floor), Some(Bid::new(5, Hearts)));
    assert_eq!(cheapest_bid(Clubs, 0, Some(Bid::new(7, Spades))), None);
    assert_eq!(cheapest_bid(Notrump, 0, Some(Bid::new(7, Spades))), Some(Bid::new(7, Notrump)));
}

const fn mirror(seat: Seat) -> Seat {
    match seat {
        North => East,
        East => North,
        South => West,
        West => South,
    }
}

/// The board with the mirrored dealer and the swapped vulnerability
fn mirror_board(board: Board) -> Board {
    Board::from_dealer(mirror(board.dealer()), board.vulnerability().swap())
}

fn dd_tables() -> impl Strategy<Value = DdTable> {
    proptest::array::uniform20(0u8..=13).prop_map(|counts| {
        DdTable::from_fn(|strain, seat| counts[strain as usize * 4 + seat as usize])
    })
}

fn has_inflation(ties: &[ParContract]) -> bool {
    ties.iter().any(|a| {
        ties.iter().any(|b| {
            a.side() == b.side()
                && a.contract.bid.strain == b.contract.bid.strain
                && a.contract.bid.level < b.contract.bid.level
        })
    })
}

proptest! {
    #[test]
    fn search_is_deterministic(table in dd_tables(), number in 1..=16u32) {
        let table = TrickTable::new(&table).expect("Valid tricks");
        let board = Board::new(number);
        let first = AuctionParSimulator::new(board, table);
        let second = AuctionParSimulator::new(board, table);
        prop_assert_eq!(first.records(), second.records());
    }

    #[test]
    fn mirroring_negates_par(table in dd_tables(), number in 1..=16u32) {
        let board = Board::new(number);
        let mirrored = DdTable::from_fn(|strain, seat| table.get(strain, mirror(seat)));

        let par = AuctionParSimulator::new(board, TrickTable::new(&table).expect("Valid tricks"));
        let mirrored = AuctionParSimulator::new(
            mirror_board(board),
            TrickTable::new(&mirrored).expect("Valid tricks"),
        );
        prop_assert_eq!(par.pre_bid().score, -mirrored.pre_bid().score);
    }

    #[test]
    fn ties_never_inflate_each_other(table in dd_tables(), number in 1..=16u32) {
        let table = TrickTable::new(&table).expect("Valid tricks");
        let auction = calls(&["1C", "P", "1NT", "X", "2D"]);
        let records = AuctionParSimulator::run(Board::new(number), table, &auction)
            .expect("Legal auction");

        for record in &records {
            prop_assert!(!has_inflation(&record.contracts), "{}", record);
            let tied = record.contracts.iter().all(|contract| contract.score == record.score);
            prop_assert!(tied, "{}", record);
        }
    }
}
