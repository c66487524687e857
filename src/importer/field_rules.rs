// ==========================================
// 主数据导入 - 字段规则库
// ==========================================
// 职责: 纯函数、无状态的单字段校验
// 半角规则: 数字 / 大写英字 / 半角片假名 / 允许的符号
// 约定: 全空白字符串视为通过（是否必填由行校验器决定）
// ==========================================

/// 半角片假名区段（含 ｡｢｣､･ 与浊音/半浊音符号）
const HALF_WIDTH_KATAKANA: std::ops::RangeInclusive<char> = '\u{FF61}'..='\u{FF9F}';

/// 允许的半角符号
const HALF_WIDTH_SYMBOLS: &[char] = &[' ', '(', ')', '-', '.', '/', ',', '\\'];

/// 半角数字
pub fn is_half_width_digits(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.chars().all(|c| c.is_ascii_digit())
}

/// 半角字符（数字 + 大写英字 + 半角片假名 + 允许符号）
pub fn is_half_width_text(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.chars().all(is_half_width_char)
}

fn is_half_width_char(c: char) -> bool {
    c.is_ascii_digit()
        || c.is_ascii_uppercase()
        || HALF_WIDTH_KATAKANA.contains(&c)
        || HALF_WIDTH_SYMBOLS.contains(&c)
}

/// 字符数（按 Unicode 标量计，非字节数）
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// 布尔标志解析
///
/// - 空值 → false
/// - 接受 1/t/T/TRUE/true/True 与 0/f/F/FALSE/false/False
/// - 其他 → "invalid <field> value"
pub fn parse_bool_flag(value: &str, field: &str) -> Result<bool, String> {
    match value.trim() {
        "" => Ok(false),
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(format!("invalid {} value", field)),
    }
}

/// 非负整数解析；空值 → 0
pub fn parse_non_negative_int(value: &str, field: &str) -> Result<i64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }

    match value.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(format!("invalid {} value", field)),
    }
}

/// 半角数字字段：半角校验 → 整数解析 → 位数上限
///
/// 返回去除首尾空白后的原文（保留前导 0）
pub fn check_half_width_number(value: &str, field: &str, max_digits: usize) -> Result<String, String> {
    let value = value.trim();
    if !is_half_width_digits(value) {
        return Err(format!("{} field has invalid half width number", field));
    }
    if value.parse::<i64>().is_err() {
        return Err(format!("invalid {} value", field));
    }
    if char_len(value) > max_digits {
        return Err(format!("invalid {} digit limit", field));
    }
    Ok(value.to_string())
}

/// 半角文本字段：半角校验 → 字符数上限
pub fn check_half_width_text(value: &str, field: &str, max_len: usize) -> Result<String, String> {
    let value = value.trim();
    if !is_half_width_text(value) {
        return Err(format!("{} field has invalid half width character", field));
    }
    if char_len(value) > max_len {
        return Err(format!("invalid {} length limit", field));
    }
    Ok(value.to_string())
}
