use time::OffsetDateTime;

pub(crate) fn entry_requires_update(
    last_modified: OffsetDateTime,
    cache_refresh_timeout: time::Duration,
    refresh_after: time::Duration,
) -> EntryRequiresUpdate {
    let diff = OffsetDateTime::now_utc() - last_modified;

    if diff <= refresh_after {
        EntryRequiresUpdate::IsRecent
    } else if diff <= cache_refresh_timeout {
        EntryRequiresUpdate::CanBeUpdated
    } else {
        EntryRequiresUpdate::MustBeUpdated
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum EntryRequiresUpdate {
    MustBeUpdated,
    CanBeUpdated,
    IsRecent,
}

#[cfg(test)]
mod test {
    use time::Duration;

    use super::*;

    #[test]
    fn test_entry_requires_update_windows() {
        let now = OffsetDateTime::now_utc();
        let refresh_after = Duration::minutes(5);
        let timeout = Duration::days(1);

        assert_eq!(
            entry_requires_update(now, timeout, refresh_after),
            EntryRequiresUpdate::IsRecent
        );
        assert_eq!(
            entry_requires_update(now - Duration::hours(1), timeout, refresh_after),
            EntryRequiresUpdate::CanBeUpdated
        );
        assert_eq!(
            entry_requires_update(now - Duration::days(2), timeout, refresh_after),
            EntryRequiresUpdate::MustBeUpdated
        );
    }
}
