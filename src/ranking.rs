use crate::config::PODIUM_SIZE;
use crate::error::FieldError;
use crate::types::{DisplayEntry, Partition, RankedUser, Slot};

/// Split an already rank-ordered list into podium (first three) and rest.
///
/// Input order is preserved and placements run 1, 2, 3, … across both groups.
/// A row with an unreadable `points` or `rank` becomes `Slot::Invalid` in its
/// own position; the other rows are unaffected.
pub fn partition(users: &[RankedUser], self_uuid: Option<&str>) -> Partition {
    let mut slots = users
        .iter()
        .enumerate()
        .map(|(i, user)| to_slot(user, i + 1, self_uuid));

    let podium = slots.by_ref().take(PODIUM_SIZE).collect();
    let rest = slots.collect();
    Partition { podium, rest }
}

fn to_slot(user: &RankedUser, placement: usize, self_uuid: Option<&str>) -> Slot {
    let parsed = parse_points(&user.points).and_then(|points| Ok((points, parse_rank(&user.rank)?)));
    match parsed {
        Ok((points, rank)) => Slot::Ranked(DisplayEntry {
            uuid: user.uuid.clone(),
            display_name: user.display_name(),
            image: user.profile_picture.clone(),
            points,
            rank,
            placement,
            is_self: self_uuid == Some(user.uuid.as_str()),
        }),
        Err(error) => Slot::Invalid {
            placement,
            uuid: user.uuid.clone(),
            display_name: user.display_name(),
            error,
        },
    }
}

pub fn parse_points(raw: &str) -> Result<u64, FieldError> {
    let value = parse_base10("points", raw)?;
    u64::try_from(value).map_err(|_| FieldError::OutOfRange { field: "points", value })
}

pub fn parse_rank(raw: &str) -> Result<u32, FieldError> {
    let value = parse_base10("rank", raw)?;
    match u32::try_from(value) {
        Ok(rank) if rank >= 1 => Ok(rank),
        _ => Err(FieldError::OutOfRange { field: "rank", value }),
    }
}

/// Whole-string base-10 parse. Trailing garbage (`"12a"`) is rejected rather
/// than truncated.
fn parse_base10(field: &'static str, raw: &str) -> Result<i64, FieldError> {
    raw.trim().parse::<i64>().map_err(|_| FieldError::NotNumeric {
        field,
        value: raw.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn user(uuid: &str, points: &str, rank: &str) -> RankedUser {
        RankedUser {
            uuid: uuid.to_string(),
            first_name: format!("First{uuid}"),
            last_name: format!("Last{uuid}"),
            profile_picture: format!("https://img.example/{uuid}.png"),
            points: points.to_string(),
            rank: rank.to_string(),
        }
    }

    fn placements(slots: &[Slot]) -> Vec<usize> {
        slots.iter().map(Slot::placement).collect()
    }

    fn uuids(slots: &[Slot]) -> Vec<&str> {
        slots.iter().map(Slot::uuid).collect()
    }

    #[test]
    fn empty_input_gives_empty_groups() {
        let p = partition(&[], None);
        assert!(p.podium.is_empty());
        assert!(p.rest.is_empty());
        assert_eq!(p, Partition::default());
    }

    #[test]
    fn five_users_split_three_and_two() {
        let users: Vec<_> = (1..=5)
            .map(|i| user(&format!("u{i}"), &(600 - i * 100).to_string(), &i.to_string()))
            .collect();
        let p = partition(&users, None);
        assert_eq!(placements(&p.podium), vec![1, 2, 3]);
        assert_eq!(placements(&p.rest), vec![4, 5]);
        assert_eq!(uuids(&p.podium), vec!["u1", "u2", "u3"]);
        assert_eq!(uuids(&p.rest), vec!["u4", "u5"]);
    }

    #[test]
    fn fewer_than_three_fill_only_podium() {
        let p = partition(&[user("a", "10", "1"), user("b", "5", "2")], None);
        assert_eq!(placements(&p.podium), vec![1, 2]);
        assert!(p.rest.is_empty());
    }

    #[test]
    fn placement_ignores_server_rank() {
        // tied ranks from the server still get distinct placements
        let p = partition(&[user("a", "10", "1"), user("b", "10", "1"), user("c", "3", "7")], None);
        match &p.podium[..] {
            [Slot::Ranked(a), Slot::Ranked(b), Slot::Ranked(c)] => {
                assert_eq!((a.rank, a.placement), (1, 1));
                assert_eq!((b.rank, b.placement), (1, 2));
                assert_eq!((c.rank, c.placement), (7, 3));
            }
            other => panic!("expected three ranked slots, got {other:?}"),
        }
    }

    #[test]
    fn no_resorting_of_input() {
        let p = partition(&[user("low", "1", "9"), user("high", "900", "1")], None);
        assert_eq!(uuids(&p.podium), vec!["low", "high"]);
    }

    #[test]
    fn malformed_points_isolated_to_one_slot() {
        let users = vec![
            user("a", "50", "1"),
            user("b", "12a", "2"),
            user("c", "30", "3"),
            user("d", "20", "4"),
        ];
        let p = partition(&users, None);
        assert_eq!(p.len(), 4);
        assert_eq!(p.invalid_count(), 1);
        assert_eq!(placements(&p.podium), vec![1, 2, 3]);
        assert_eq!(placements(&p.rest), vec![4]);
        match &p.podium[1] {
            Slot::Invalid { uuid, error, .. } => {
                assert_eq!(uuid, "b");
                assert_eq!(
                    *error,
                    FieldError::NotNumeric { field: "points", value: "12a".to_string() }
                );
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
        assert!(matches!(&p.rest[0], Slot::Ranked(e) if e.points == 20));
    }

    #[test]
    fn malformed_rank_is_reported() {
        let p = partition(&[user("a", "5", "first")], None);
        assert!(matches!(
            &p.podium[0],
            Slot::Invalid { error: FieldError::NotNumeric { field: "rank", .. }, .. }
        ));
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert_eq!(
            parse_points("-4"),
            Err(FieldError::OutOfRange { field: "points", value: -4 })
        );
        assert_eq!(parse_rank("0"), Err(FieldError::OutOfRange { field: "rank", value: 0 }));
        assert_eq!(parse_points(" 42 "), Ok(42));
        assert!(parse_points("").is_err());
        assert!(parse_points("4.5").is_err());
    }

    #[test]
    fn marks_self_entry() {
        let p = partition(&[user("a", "5", "1"), user("me", "4", "2")], Some("me"));
        let flags: Vec<bool> = p
            .podium
            .iter()
            .map(|s| matches!(s, Slot::Ranked(e) if e.is_self))
            .collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn display_fields_are_copied() {
        let p = partition(&[user("a", "5", "1")], None);
        match &p.podium[0] {
            Slot::Ranked(e) => {
                assert_eq!(e.display_name, "Firsta Lasta");
                assert_eq!(e.image, "https://img.example/a.png");
            }
            other => panic!("expected Ranked, got {other:?}"),
        }
    }
}
