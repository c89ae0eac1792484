// ==========================================
// 预测对账系统 - 数据清洗器实现
// ==========================================
// 职责: NULL 标准化 / 数值解析（含德式数字格式）
// ==========================================

pub struct DataCleaner;

impl DataCleaner {
    /// 空白字符串统一为 None
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析普通数值（小数点为 `.`）,非有限值视为无法解析
    pub fn parse_number(&self, value: &str) -> Option<f64> {
        value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// 解析德式数值: `.` 为千位分隔符, `,` 为小数点
    ///
    /// 工作簿中的原生数值（如 `1234.5`,仅一个 `.` 且其后不是三位数字）保持原样
    pub fn parse_german_number(&self, value: &str) -> Option<f64> {
        let trimmed = value.trim().trim_end_matches('€').trim();
        if trimmed.is_empty() {
            return None;
        }

        if !trimmed.contains(',') && !looks_like_thousands_grouping(trimmed) {
            return self.parse_number(trimmed);
        }

        let normalized = trimmed.replace('.', "").replace(',', ".");
        self.parse_number(&normalized)
    }
}

/// `1.234` / `12.345.678` 形式视为千位分组
fn looks_like_thousands_grouping(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    let mut groups = digits.split('.');
    let first = match groups.next() {
        Some(g) => g,
        None => return false,
    };
    if first.is_empty() || first.len() > 3 || !first.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    let rest: Vec<&str> = groups.collect();
    !rest.is_empty()
        && rest
            .iter()
            .all(|g| g.len() == 3 && g.chars().all(|c| c.is_ascii_digit()))
}
