/// Profile columns the student directory may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum StudentSortColumn {
    #[default]
    Id,
    UserId,
    FirstName,
    MiddleName,
    LastName,
    ContactNo,
    GuardianName,
    Form,
    IsActive,
}

impl StudentSortColumn {
    /// Unknown column names fall back to `id`.
    pub(crate) fn parse(value: &str) -> Self {
        match value.trim() {
            "user_id" => Self::UserId,
            "first_name" => Self::FirstName,
            "middle_name" => Self::MiddleName,
            "last_name" => Self::LastName,
            "contact_no" => Self::ContactNo,
            "guardian_name" => Self::GuardianName,
            "form" => Self::Form,
            "is_active" => Self::IsActive,
            _ => Self::Id,
        }
    }

    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::UserId => "user_id",
            Self::FirstName => "first_name",
            Self::MiddleName => "middle_name",
            Self::LastName => "last_name",
            Self::ContactNo => "contact_no",
            Self::GuardianName => "guardian_name",
            Self::Form => "form",
            Self::IsActive => "is_active",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct StudentQuery {
    /// Lowercased, trimmed needle; `None` lists everyone.
    pub(crate) search: Option<String>,
    pub(crate) sort: StudentSortColumn,
    pub(crate) descending: bool,
}

impl StudentQuery {
    pub(crate) fn from_params(
        search: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Self {
        let search = search.map(|value| value.trim().to_lowercase()).filter(|value| !value.is_empty());
        let sort = sort.map(StudentSortColumn::parse).unwrap_or_default();
        let descending = order.is_some_and(|value| value.trim().eq_ignore_ascii_case("desc"));
        Self { search, sort, descending }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sort_falls_back_to_id() {
        assert_eq!(StudentSortColumn::parse("password"), StudentSortColumn::Id);
        assert_eq!(StudentSortColumn::parse("id; DROP TABLE users"), StudentSortColumn::Id);
        assert_eq!(StudentSortColumn::parse(" last_name "), StudentSortColumn::LastName);
    }

    #[test]
    fn every_column_round_trips_through_parse() {
        for column in [
            StudentSortColumn::Id,
            StudentSortColumn::UserId,
            StudentSortColumn::FirstName,
            StudentSortColumn::MiddleName,
            StudentSortColumn::LastName,
            StudentSortColumn::ContactNo,
            StudentSortColumn::GuardianName,
            StudentSortColumn::Form,
            StudentSortColumn::IsActive,
        ] {
            assert_eq!(StudentSortColumn::parse(column.column()), column);
        }
    }

    #[test]
    fn params_are_normalised() {
        let query = StudentQuery::from_params(Some("  JaNe "), Some("form"), Some("DESC"));
        assert_eq!(query.search.as_deref(), Some("jane"));
        assert_eq!(query.sort, StudentSortColumn::Form);
        assert!(query.descending);

        let defaults = StudentQuery::from_params(Some("   "), None, Some("sideways"));
        assert_eq!(defaults, StudentQuery::default());
    }
}
