/// Page size bounds applied to every listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: 100,
            max_limit: 1000,
        }
    }
}

/// Normalized pagination window. Always bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: u32,
    pub offset: u32,
}

impl ListOptions {
    /// `limit <= 0` falls back to the default page size, larger limits are
    /// clamped to the maximum and a negative `offset` becomes zero.
    pub fn normalize(limit: i64, offset: i64, limits: PageLimits) -> Self {
        let max_limit = limits.max_limit.max(1);
        let limit = if limit <= 0 {
            limits.default_limit.clamp(1, max_limit)
        } else {
            u32::try_from(limit).unwrap_or(u32::MAX).min(max_limit)
        };
        let offset = u32::try_from(offset.max(0)).unwrap_or(u32::MAX);

        Self { limit, offset }
    }
}
