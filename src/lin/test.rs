use super::*;
use crate::contract::{Bid, Strain};
use crate::deal::Partnership;
use crate::tricks::DdTable;

const TRAVELLER: &str = "hv_popuplin('pn|jcgiordano,Snowball86,jagiordano,Ozzy43|st%7C%7Cmd%7C3S238JHKD4578JC37A%2CS5TAH368TD9TC56JQ%2CS7KH457QAD3QKAC4T%2C%7Crh%7C%7Cah%7CBoard%201%7Csv%7Co%7Cmb%7C1H%7Cmb%7Cp%7Cmb%7C1S%7Cmb%7Cp%7Cmb%7C2N%7Cmb%7Cp%7Cmb%7C3N%7Cmb%7Cp%7Cmb%7Cp%7Cmb%7Cp%7Cpc%7CC8%7Cpc%7CCA%7Cpc%7CC6%7Cpc%7CC4%7Cmc%7C9%7C');this.style.color='red';return false;";

const ANNOTATED: &str = "md|3S56TH23789D4C256K,S4JAHD26JQKAC8JQA,S389KH46TAD3789C4,|rh||ah|Board 5|sv|n|mb|p|mb|p|mb|p|mb|2C!|an|forcing%3B%204%20or%20fewer%20losers|mb|p|mb|2D|an|at%20least%201%20A%20or%20K|mb|p|";

#[test]
fn decode_a_traveller_record() {
    let lin = Lin::parse(TRAVELLER).expect("Valid LIN");

    assert_eq!(lin.dealer, Seat::North);
    assert_eq!(lin.vulnerability, Vulnerability::NONE);
    assert_eq!(lin.number, Some(1));
    assert_eq!(lin.board(), Board::new(1));
    assert_eq!(lin.players[Seat::South as usize], "jcgiordano");
    assert_eq!(lin.players[Seat::East as usize], "Ozzy43");

    assert_eq!(
        lin.deal.display(Seat::North).to_string(),
        "N:K7.AQ754.AKQ3.T4 Q964.J92.62.K982 J832.K.J8754.A73 AT5.T863.T9.QJ65"
    );

    let calls: Vec<_> = lin.calls.iter().map(ToString::to_string).collect();
    assert_eq!(calls, ["1H", "P", "1S", "P", "2NT", "P", "3NT", "P", "P", "P"]);

    assert_eq!(lin.plays.len(), 4);
    assert_eq!(lin.plays[0], Card::new(Suit::Clubs, 8));
    assert_eq!(lin.deal.holder(lin.plays[0]), Some(Seat::East));
    assert_eq!(lin.claim, Some(9));
}

#[test]
fn alerts_and_annotations_are_skipped() {
    let lin = Lin::parse(ANNOTATED).expect("Valid LIN");

    assert_eq!(lin.board(), Board::new(5));
    assert_eq!(lin.vulnerability, Vulnerability::NS);
    assert_eq!(lin.calls.len(), 7);
    assert_eq!(lin.calls[3], Call::Bid(Bid::new(2, Strain::Clubs)));
    assert!(lin.players.iter().all(String::is_empty));
    assert!(lin.plays.is_empty());
    assert_eq!(lin.claim, None);

    for seat in Seat::ALL {
        assert_eq!(lin.deal[seat].len(), 13);
    }
}

#[test]
fn unlabelled_boards_follow_dealer_and_vulnerability() {
    let lin = Lin::parse("md|2S56TH23789D4C256K,S4JAHD26JQKAC8JQA,S389KH46TAD3789C4,|sv|b|")
        .expect("Valid LIN");
    assert_eq!(lin.number, None);
    assert_eq!(lin.dealer, Seat::West);
    assert_eq!(lin.board(), Board::new(4));

    // A label contradicting the deal is not trusted
    let lin = Lin::parse("ah|Board 1|md|2S56TH23789D4C256K,S4JAHD26JQKAC8JQA,S389KH46TAD3789C4,|sv|b|")
        .expect("Valid LIN");
    assert_eq!(lin.board(), Board::new(4));
}

#[test]
fn escaped_names_decode_as_utf8() {
    let lin = Lin::parse(
        "pn|Ren%C3%A9e,%FFx,%2Bplus,Dave|md|3S56TH23789D4C256K,S4JAHD26JQKAC8JQA,S389KH46TAD3789C4,|",
    )
    .expect("Valid LIN");

    assert_eq!(lin.players[Seat::South as usize], "Renée");
    assert_eq!(lin.players[Seat::West as usize], "\u{FFFD}x");
    assert_eq!(lin.players[Seat::North as usize], "+plus");
    assert_eq!(lin.players[Seat::East as usize], "Dave");
}

#[test]
fn malformed_records() {
    assert_eq!(Lin::parse("sv|o|mb|p|"), Err(ParseLinError::MissingDeal));
    assert_eq!(
        Lin::parse("md|5SA,,,|"),
        Err(ParseLinError::InvalidDealer("5SA,,,".into()))
    );
    assert_eq!(Lin::parse("md|1SA,SK,,|"), Err(ParseLinError::IncompleteDeal));
    assert_eq!(
        Lin::parse("md|1SAK,SA,,|"),
        Err(ParseLinError::DuplicateCard(Card::new(Suit::Spades, 14)))
    );
    assert_eq!(
        Lin::parse("md|1AS,,,|"),
        Err(ParseLinError::InvalidHand("AS".into()))
    );
    assert_eq!(
        Lin::parse("ah|Board|"),
        Err(ParseLinError::InvalidBoard("Board".into()))
    );
    assert_eq!(
        Lin::parse("sv|x|"),
        Err(ParseLinError::InvalidVulnerability("x".into()))
    );
    assert!(matches!(
        Lin::parse("mb|8C|"),
        Err(ParseLinError::InvalidCall(_))
    ));
    assert_eq!(Lin::parse("pc|C1|"), Err(ParseLinError::InvalidCard("C1".into())));
    assert_eq!(Lin::parse("mc|14|"), Err(ParseLinError::InvalidClaim("14".into())));
}

#[test]
fn par_of_a_recorded_auction() {
    let lin = Lin::parse(TRAVELLER).expect("Valid LIN");
    let table = DdTable::from_fn(|strain, seat| match (strain, seat.partnership()) {
        (Strain::Notrump, Partnership::NS) => 9,
        _ => 6,
    });
    let table = TrickTable::new(&table).expect("Valid tricks");
    let records = lin.par(table).expect("Legal auction");

    assert_eq!(records.len(), lin.calls.len() + 1);
    assert_eq!(records[0].to_string(), "Pre-bid: +400 3NT by NS =");
    assert_eq!(records[10].to_string(), "P by E: +400 3NT by N =");
}
