// SPDX-FileCopyrightText: Copyright (C) 2018-2026 Uwe Klotz <uwedotklotzatgmaildotcom> et al.
// SPDX-License-Identifier: AGPL-3.0-or-later

use super::*;

#[test]
fn validate_time_sig() {
    assert!(TimeSignature::new(0, 0).validate().is_err());
    assert!(TimeSignature::new(0, 1).validate().is_err());
    assert!(TimeSignature::new(1, 0).validate().is_err());
    assert!(TimeSignature::new(1, 1).validate().is_ok());
    assert!(TimeSignature::new(3, 4).validate().is_ok());
    assert!(TimeSignature::new(4, 4).validate().is_ok());
    assert!(TimeSignature::new(7, 8).validate().is_ok());
}

#[test]
fn parse_time_sig() {
    assert_eq!(Ok(TimeSignature::new(4, 4)), "4/4".parse());
    assert_eq!(Ok(TimeSignature::new(3, 4)), " 3 / 4 ".parse());
    assert!("4".parse::<TimeSignature>().is_err());
    assert!("4/".parse::<TimeSignature>().is_err());
    assert!("0/4".parse::<TimeSignature>().is_err());
    assert!("a/b".parse::<TimeSignature>().is_err());
    assert!("-4/4".parse::<TimeSignature>().is_err());
}

#[test]
fn display_time_sig() {
    assert_eq!("6/8", TimeSignature::new(6, 8).to_string());
    assert_eq!("4/4", TimeSignature::default().to_string());
}

#[test]
fn next_label_wraps_into_next_measure() {
    assert_eq!(BeatLabel::new(1, 2), BeatLabel::new(1, 1).next(4));
    assert_eq!(BeatLabel::new(2, 1), BeatLabel::new(1, 4).next(4));
    assert_eq!(BeatLabel::new(8, 1), BeatLabel::new(7, 3).next(3));
}

#[test]
fn measure_number_zero_is_skipped() {
    assert_eq!(BeatLabel::new(1, 1), BeatLabel::new(-1, 4).next(4));
    assert_eq!(BeatLabel::new(-1, 4), BeatLabel::new(1, 1).prev(4));
    assert_eq!(BeatLabel::new(-2, 4), BeatLabel::new(-1, 1).prev(4));
    assert_eq!(BeatLabel::new(-1, 1), BeatLabel::new(-2, 4).next(4));
}

#[test]
fn prev_is_inverse_of_next() {
    let mut label = BeatLabel::new(-3, 2);
    for _ in 0..20 {
        let next = label.next(3);
        assert!(next.is_valid());
        assert_eq!(label, next.prev(3));
        label = next;
    }
}

#[test]
fn display_label() {
    assert_eq!("12.3", BeatLabel::new(12, 3).to_string());
    assert_eq!("-1.4", BeatLabel::new(-1, 4).to_string());
    assert!(BeatLabel::new(-1, 4).is_valid());
    assert!(!BeatLabel::new(0, 4).is_valid());
    assert!(BeatLabel::new(3, 1).is_downbeat());
}
