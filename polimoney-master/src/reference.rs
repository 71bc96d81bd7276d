//! Static reference tables
//!
//! Compiled-in master data used by the district generators:
//! - 47 prefectures (JIS X 0401 code -> name)
//! - Lower-house single-member district counts per prefecture
//!   (2022 reapportionment, 289 districts)
//! - Upper-house constituencies including the two merged districts
//!   (鳥取・島根, 徳島・高知), 45 entries

use serde::Serialize;

/// A prefecture registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prefecture {
    /// Two-digit prefecture code ("01".."47")
    pub code: &'static str,
    pub name: &'static str,
}

/// An upper-house constituency
///
/// `seats` is the number of seats contested at each triennial election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpperHouseDistrict {
    /// One code for an ordinary district, two for a merged district
    pub prefecture_codes: &'static [&'static str],
    pub name: &'static str,
    pub seats: u32,
}

pub const PREFECTURES: [Prefecture; 47] = [
    Prefecture { code: "01", name: "北海道" },
    Prefecture { code: "02", name: "青森県" },
    Prefecture { code: "03", name: "岩手県" },
    Prefecture { code: "04", name: "宮城県" },
    Prefecture { code: "05", name: "秋田県" },
    Prefecture { code: "06", name: "山形県" },
    Prefecture { code: "07", name: "福島県" },
    Prefecture { code: "08", name: "茨城県" },
    Prefecture { code: "09", name: "栃木県" },
    Prefecture { code: "10", name: "群馬県" },
    Prefecture { code: "11", name: "埼玉県" },
    Prefecture { code: "12", name: "千葉県" },
    Prefecture { code: "13", name: "東京都" },
    Prefecture { code: "14", name: "神奈川県" },
    Prefecture { code: "15", name: "新潟県" },
    Prefecture { code: "16", name: "富山県" },
    Prefecture { code: "17", name: "石川県" },
    Prefecture { code: "18", name: "福井県" },
    Prefecture { code: "19", name: "山梨県" },
    Prefecture { code: "20", name: "長野県" },
    Prefecture { code: "21", name: "岐阜県" },
    Prefecture { code: "22", name: "静岡県" },
    Prefecture { code: "23", name: "愛知県" },
    Prefecture { code: "24", name: "三重県" },
    Prefecture { code: "25", name: "滋賀県" },
    Prefecture { code: "26", name: "京都府" },
    Prefecture { code: "27", name: "大阪府" },
    Prefecture { code: "28", name: "兵庫県" },
    Prefecture { code: "29", name: "奈良県" },
    Prefecture { code: "30", name: "和歌山県" },
    Prefecture { code: "31", name: "鳥取県" },
    Prefecture { code: "32", name: "島根県" },
    Prefecture { code: "33", name: "岡山県" },
    Prefecture { code: "34", name: "広島県" },
    Prefecture { code: "35", name: "山口県" },
    Prefecture { code: "36", name: "徳島県" },
    Prefecture { code: "37", name: "香川県" },
    Prefecture { code: "38", name: "愛媛県" },
    Prefecture { code: "39", name: "高知県" },
    Prefecture { code: "40", name: "福岡県" },
    Prefecture { code: "41", name: "佐賀県" },
    Prefecture { code: "42", name: "長崎県" },
    Prefecture { code: "43", name: "熊本県" },
    Prefecture { code: "44", name: "大分県" },
    Prefecture { code: "45", name: "宮崎県" },
    Prefecture { code: "46", name: "鹿児島県" },
    Prefecture { code: "47", name: "沖縄県" },
];

/// Lower-house single-member districts per prefecture
pub const LOWER_HOUSE_SEATS: [(&str, u32); 47] = [
    ("01", 12), // 北海道
    ("02", 3), // 青森県
    ("03", 3), // 岩手県
    ("04", 5), // 宮城県
    ("05", 3), // 秋田県
    ("06", 3), // 山形県
    ("07", 4), // 福島県
    ("08", 7), // 茨城県
    ("09", 5), // 栃木県
    ("10", 5), // 群馬県
    ("11", 16), // 埼玉県
    ("12", 14), // 千葉県
    ("13", 30), // 東京都
    ("14", 20), // 神奈川県
    ("15", 5), // 新潟県
    ("16", 3), // 富山県
    ("17", 3), // 石川県
    ("18", 2), // 福井県
    ("19", 2), // 山梨県
    ("20", 5), // 長野県
    ("21", 5), // 岐阜県
    ("22", 6), // 静岡県
    ("23", 16), // 愛知県
    ("24", 5), // 三重県
    ("25", 3), // 滋賀県
    ("26", 6), // 京都府
    ("27", 19), // 大阪府
    ("28", 12), // 兵庫県
    ("29", 3), // 奈良県
    ("30", 2), // 和歌山県
    ("31", 2), // 鳥取県
    ("32", 2), // 島根県
    ("33", 4), // 岡山県
    ("34", 7), // 広島県
    ("35", 3), // 山口県
    ("36", 2), // 徳島県
    ("37", 3), // 香川県
    ("38", 3), // 愛媛県
    ("39", 2), // 高知県
    ("40", 11), // 福岡県
    ("41", 2), // 佐賀県
    ("42", 3), // 長崎県
    ("43", 4), // 熊本県
    ("44", 3), // 大分県
    ("45", 3), // 宮崎県
    ("46", 4), // 鹿児島県
    ("47", 4), // 沖縄県
];

pub const UPPER_HOUSE_DISTRICTS: [UpperHouseDistrict; 45] = [
    UpperHouseDistrict { prefecture_codes: &["01"], name: "北海道選挙区", seats: 3 },
    UpperHouseDistrict { prefecture_codes: &["02"], name: "青森県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["03"], name: "岩手県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["04"], name: "宮城県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["05"], name: "秋田県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["06"], name: "山形県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["07"], name: "福島県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["08"], name: "茨城県選挙区", seats: 2 },
    UpperHouseDistrict { prefecture_codes: &["09"], name: "栃木県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["10"], name: "群馬県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["11"], name: "埼玉県選挙区", seats: 4 },
    UpperHouseDistrict { prefecture_codes: &["12"], name: "千葉県選挙区", seats: 3 },
    UpperHouseDistrict { prefecture_codes: &["13"], name: "東京都選挙区", seats: 6 },
    UpperHouseDistrict { prefecture_codes: &["14"], name: "神奈川県選挙区", seats: 5 },
    UpperHouseDistrict { prefecture_codes: &["15"], name: "新潟県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["16"], name: "富山県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["17"], name: "石川県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["18"], name: "福井県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["19"], name: "山梨県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["20"], name: "長野県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["21"], name: "岐阜県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["22"], name: "静岡県選挙区", seats: 2 },
    UpperHouseDistrict { prefecture_codes: &["23"], name: "愛知県選挙区", seats: 4 },
    UpperHouseDistrict { prefecture_codes: &["24"], name: "三重県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["25"], name: "滋賀県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["26"], name: "京都府選挙区", seats: 2 },
    UpperHouseDistrict { prefecture_codes: &["27"], name: "大阪府選挙区", seats: 4 },
    UpperHouseDistrict { prefecture_codes: &["28"], name: "兵庫県選挙区", seats: 3 },
    UpperHouseDistrict { prefecture_codes: &["29"], name: "奈良県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["30"], name: "和歌山県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["31", "32"], name: "鳥取県・島根県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["33"], name: "岡山県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["34"], name: "広島県選挙区", seats: 2 },
    UpperHouseDistrict { prefecture_codes: &["35"], name: "山口県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["36", "39"], name: "徳島県・高知県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["37"], name: "香川県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["38"], name: "愛媛県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["40"], name: "福岡県選挙区", seats: 3 },
    UpperHouseDistrict { prefecture_codes: &["41"], name: "佐賀県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["42"], name: "長崎県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["43"], name: "熊本県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["44"], name: "大分県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["45"], name: "宮崎県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["46"], name: "鹿児島県選挙区", seats: 1 },
    UpperHouseDistrict { prefecture_codes: &["47"], name: "沖縄県選挙区", seats: 1 },
];

/// Look up a prefecture by code in the given registry
pub fn find_prefecture<'a>(prefectures: &'a [Prefecture], code: &str) -> Option<&'a Prefecture> {
    prefectures.iter().find(|p| p.code == code)
}
