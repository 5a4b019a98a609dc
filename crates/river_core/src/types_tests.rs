use super::*;

#[test]
fn test_square_names() {
    assert_eq!(sq_to_coord(0), "a1");
    assert_eq!(sq_to_coord(28), "e4");
    assert_eq!(sq_to_coord(63), "h8");
    for s in 0..64u8 {
        assert_eq!(coord_to_sq(&sq_to_coord(s)), Ok(s));
    }
}

#[test]
fn test_bad_square_names() {
    for text in ["", "a", "i1", "a9", "a0", "A1", "e44"] {
        assert!(coord_to_sq(text).is_err(), "{text:?} should be rejected");
    }
}

#[test]
fn test_special_codes() {
    for code in 0..8u8 {
        assert_eq!(Special::from_code(code).map(Special::code), Ok(code));
    }
    assert_eq!(
        Special::from_code(8),
        Err(ChessError::InvalidSpecial { code: 8 })
    );
    for (code, special) in Special::ALL.into_iter().enumerate() {
        assert_eq!(special.code() as usize, code);
        assert_eq!(Move::from_bits(code as u16).special, special);
    }
}

#[test]
fn test_move_bits_layout() {
    // b7 -> a8 promoting to rook: src (1, 6), dst (0, 7)
    let mv = Move::with_special(49, 56, Special::PromoteRook);
    let bits = mv.to_bits();
    assert_eq!(bits & 7, 2);
    assert_eq!((bits >> 3) & 7, 0); // dst file
    assert_eq!((bits >> 6) & 7, 7); // dst rank
    assert_eq!((bits >> 9) & 7, 1); // src file
    assert_eq!((bits >> 12) & 7, 6); // src rank
}

#[test]
fn test_move_bits_round_trip() {
    for bits in 0..(1u16 << 15) {
        assert_eq!(Move::from_bits(bits).to_bits(), bits);
    }
}

#[test]
fn test_side_from_ply() {
    assert_eq!(Color::from_ply(0), Color::White);
    assert_eq!(Color::from_ply(1), Color::Black);
    assert_eq!(Color::from_ply(6), Color::White);
}
