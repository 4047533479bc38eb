const RANKS: [char; 13] = ['2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A'];

/// Encodes two hole cards as `13 * x + y + 1` (1..=169): pairs on the
/// diagonal, suited hands with x > y, offsuit hands with x < y. Ranks run
/// 2..=14 (ace high). Returns 0 for out-of-range ranks.
#[cfg(test)]
pub fn two_start_cards(rank1: u8, suit1: char, rank2: u8, suit2: char) -> i64 {
    if !(2..=14).contains(&rank1) || !(2..=14).contains(&rank2) {
        return 0;
    }
    let (r1, r2) = (i64::from(rank1), i64::from(rank2));
    if r1 == r2 {
        13 * (r2 - 2) + (r2 - 1)
    } else if (suit1 == suit2 && r1 > r2) || (suit1 != suit2 && r2 > r1) {
        13 * (r1 - 2) + (r2 - 1)
    } else {
        13 * (r2 - 2) + (r1 - 1)
    }
}

/// `AKs`, `QQ`, `72o`; `xx` for anything outside 1..=169.
pub fn two_start_card_string(code: i64) -> String {
    if !(1..=169).contains(&code) {
        return "xx".to_string();
    }
    let x = ((code - 1) / 13) as usize;
    let y = ((code - 1) % 13) as usize;
    match x.cmp(&y) {
        std::cmp::Ordering::Equal => format!("{}{}", RANKS[x], RANKS[y]),
        std::cmp::Ordering::Greater => format!("{}{}s", RANKS[x], RANKS[y]),
        std::cmp::Ordering::Less => format!("{}{}o", RANKS[y], RANKS[x]),
    }
}
