// ==========================================
// 预测对账系统 - 表结构校验器
// ==========================================
// 职责: 校验源表是否包含必需列,失败时一次性列出全部缺失列
// 兜底: 精确匹配失败后,将表头统一转小写再匹配一次（显式记录）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRow;
use std::collections::HashMap;
use tracing::{info, warn};

// ==========================================
// ColumnResolution - 列名解析结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ColumnResolution {
    columns: HashMap<String, String>, // 期望列名 → 源表实际列名
    pub lowercased: bool,             // 是否经小写兜底匹配
}

impl ColumnResolution {
    /// 期望列名对应的源表实际列名
    pub fn actual(&self, expected: &str) -> Option<&str> {
        self.columns.get(expected).map(String::as_str)
    }

    /// 读取行中期望列的值（去空白,空串视为缺失）
    pub fn value<'a>(&self, row: &'a RawRow, expected: &str) -> Option<&'a str> {
        let actual = self.actual(expected)?;
        row.get(actual)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

// ==========================================
// SchemaValidator
// ==========================================
pub struct SchemaValidator;

impl SchemaValidator {
    /// 解析必需列
    ///
    /// # 返回
    /// - Ok(ColumnResolution): 所有必需列均已找到
    /// - Err(MissingExpectedColumns): 小写兜底后仍缺失的列 + 现有列
    pub fn resolve(
        &self,
        headers: &[String],
        required: &[String],
    ) -> ImportResult<ColumnResolution> {
        let exact_missing: Vec<&String> = required
            .iter()
            .filter(|name| !headers.iter().any(|h| h == *name))
            .collect();

        if exact_missing.is_empty() {
            let columns = required
                .iter()
                .map(|name| (name.clone(), name.clone()))
                .collect();
            return Ok(ColumnResolution {
                columns,
                lowercased: false,
            });
        }

        warn!(
            missing = ?exact_missing,
            available = ?headers,
            "必需列未精确匹配,尝试小写表头兜底"
        );

        let mut columns = HashMap::new();
        let mut missing = Vec::new();
        for name in required {
            match find_lowercased(headers, name) {
                Some(actual) => {
                    columns.insert(name.clone(), actual.to_string());
                }
                None => missing.push(name.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(ImportError::MissingExpectedColumns {
                missing,
                available: headers.to_vec(),
            });
        }

        info!("小写表头兜底匹配成功");
        Ok(ColumnResolution {
            columns,
            lowercased: true,
        })
    }

    /// 解析可选列,沿用必需列的匹配方式；找到则加入 resolution
    pub fn resolve_optional(
        &self,
        headers: &[String],
        resolution: &mut ColumnResolution,
        name: &str,
    ) -> bool {
        let found = if resolution.lowercased {
            find_lowercased(headers, name)
        } else {
            headers.iter().find(|h| *h == name).map(String::as_str)
        };

        match found {
            Some(actual) => {
                resolution
                    .columns
                    .insert(name.to_string(), actual.to_string());
                true
            }
            None => false,
        }
    }
}

fn find_lowercased<'a>(headers: &'a [String], name: &str) -> Option<&'a str> {
    let wanted = name.to_lowercase();
    headers
        .iter()
        .find(|h| h.to_lowercase() == wanted)
        .map(String::as_str)
}
