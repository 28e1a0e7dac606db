pub const DEFAULT_PAGE_LIMIT: i64 = 20;
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Clamped pagination window; limit defaults to 20 and caps at 200.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT);
        let offset = offset.unwrap_or(0).max(0);
        Self { limit, offset }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_caps() {
        assert_eq!(Pagination::clamped(None, None), Pagination { limit: 20, offset: 0 });
        assert_eq!(Pagination::clamped(Some(500), Some(-3)), Pagination { limit: 200, offset: 0 });
        assert_eq!(Pagination::clamped(Some(0), Some(40)), Pagination { limit: 1, offset: 40 });
    }
}
