use super::*;

#[test]
fn test_knight_attacks() {
    // Knight on e4 (28) reaches all 8 squares
    assert_eq!(knight_attacks(28).popcount(), 8);

    // Knight on a1 reaches only c2 and b3
    let attacks = knight_attacks(0);
    assert_eq!(attacks.popcount(), 2);
    assert!(attacks.contains(10)); // c2
    assert!(attacks.contains(17)); // b3

    // No wrap-around from the h-file
    let attacks = knight_attacks(7); // h1
    assert_eq!(attacks, Bitboard::EMPTY.with(13).with(22)); // f2, g3
}

#[test]
fn test_king_attacks() {
    assert_eq!(king_attacks(28).popcount(), 8);
    assert_eq!(king_attacks(0).popcount(), 3);
    assert_eq!(king_attacks(63).popcount(), 3);
}

#[test]
fn test_pawn_attacks() {
    // White pawn on e4 attacks d5 and f5
    let attacks = pawn_attacks(28, true);
    assert_eq!(attacks, Bitboard::EMPTY.with(35).with(37));

    // White pawn on a2 attacks only b3
    assert_eq!(pawn_attacks(8, true), Bitboard::from_square(17));

    // Black pawn on h7 attacks only g6
    assert_eq!(pawn_attacks(55, false), Bitboard::from_square(46));
}

#[test]
fn test_rook_attacks_empty_board() {
    assert_eq!(rook_attacks(28, Bitboard::EMPTY).popcount(), 14);
}

#[test]
fn test_bishop_attacks_empty_board() {
    assert_eq!(bishop_attacks(28, Bitboard::EMPTY).popcount(), 13);
}

#[test]
fn test_rook_attacks_stop_at_first_blocker() {
    // Rook on a1, blocker on a4
    let attacks = rook_attacks(0, Bitboard::from_square(24));
    assert!(attacks.contains(8)); // a2
    assert!(attacks.contains(16)); // a3
    assert!(attacks.contains(24)); // a4, capturable
    assert!(!attacks.contains(32)); // a5, behind the blocker
    assert!(attacks.contains(7)); // h1
}

#[test]
fn test_negative_rays_stop_at_nearest_blocker() {
    // Rook on h8 with blockers on h3 and h5: only h7, h6, h5 downwards
    let occupied = Bitboard::EMPTY.with(23).with(39);
    let attacks = rook_attacks(63, occupied);
    assert!(attacks.contains(55)); // h7
    assert!(attacks.contains(39)); // h5
    assert!(!attacks.contains(31)); // h4
    assert!(!attacks.contains(23)); // h3

    // Bishop on h8 with a blocker on e5
    let attacks = bishop_attacks(63, Bitboard::from_square(36));
    assert_eq!(attacks, Bitboard::EMPTY.with(54).with(45).with(36));
}

#[test]
fn test_queen_is_union() {
    let occupied = Bitboard::EMPTY.with(20).with(44);
    assert_eq!(
        queen_attacks(28, occupied),
        rook_attacks(28, occupied) | bishop_attacks(28, occupied)
    );
}
