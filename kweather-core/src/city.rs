//! Supported cities and resolution of user input to a canonical name.
//!
//! The table is built once per process and never mutated. Canonical names are
//! the spelling OpenWeather expects in its `q` parameter.

use std::{collections::HashMap, sync::LazyLock};

/// A supported city: Korean display name paired with the canonical English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityEntry {
    pub korean: &'static str,
    pub english: &'static str,
}

impl std::fmt::Display for CityEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.korean, self.english)
    }
}

const fn city(korean: &'static str, english: &'static str) -> CityEntry {
    CityEntry { korean, english }
}

const BUILTIN_CITIES: &[CityEntry] = &[
    city("서울", "Seoul"),
    city("부산", "Busan"),
    city("대구", "Daegu"),
    city("인천", "Incheon"),
    city("광주", "Gwangju"),
    city("대전", "Daejeon"),
    city("울산", "Ulsan"),
    city("수원", "Suwon"),
    city("고양", "Goyang"),
    city("성남", "Seongnam"),
    city("부천", "Bucheon"),
    city("안양", "Anyang"),
    city("안산", "Ansan"),
    city("의정부", "Uijeongbu"),
    city("파주", "Paju"),
    city("평택", "Pyeongtaek"),
    city("강릉", "Gangneung"),
    city("춘천", "Chuncheon"),
    city("원주", "Wonju"),
    city("동해", "Donghae"),
    city("속초", "Sokcho"),
    city("삼척", "Samcheok"),
    city("양양", "Yangyang"),
    city("전주", "Jeonju"),
    city("여수", "Yeosu"),
    city("목포", "Mokpo"),
    city("순천", "Suncheon"),
    city("군산", "Gunsan"),
    city("광양", "Gwangyang"),
    city("나주", "Naju"),
    city("청주", "Cheongju"),
    city("천안", "Cheonan"),
    city("아산", "Asan"),
    city("공주", "Gongju"),
    city("논산", "Nonsan"),
    city("서산", "Seosan"),
    city("제주", "Jeju"),
    city("서귀포", "Seogwipo"),
    city("이천", "Icheon"),
    city("여주", "Yeoju"),
    city("충주", "Chungju"),
    city("김포", "Gimpo"),
    city("포항", "Pohang"),
    city("진주", "Jinju"),
    city("경주", "Gyeongju"),
    city("구미", "Gumi"),
    city("김해", "Gimhae"),
    city("통영", "Tongyeong"),
    city("창원", "Changwon"),
];

static BUILTIN: LazyLock<CityTable> = LazyLock::new(|| CityTable::new(BUILTIN_CITIES));

/// What the weather client needs to query a city: the canonical name plus the
/// text the user actually typed (used as the fallback query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityQuery {
    pub canonical: String,
    pub input: String,
}

impl CityQuery {
    pub fn new(canonical: impl Into<String>, input: impl Into<String>) -> Self {
        Self { canonical: canonical.into(), input: input.into() }
    }
}

/// Outcome of resolving user input against the city table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(CityQuery),
    Unresolved,
}

/// Immutable lookup table over a fixed set of cities.
#[derive(Debug)]
pub struct CityTable {
    entries: &'static [CityEntry],
    by_korean: HashMap<&'static str, &'static str>,
    by_english: HashMap<&'static str, &'static str>,
}

impl CityTable {
    pub fn new(entries: &'static [CityEntry]) -> Self {
        let by_korean = entries.iter().map(|e| (e.korean, e.english)).collect();
        let by_english = entries.iter().map(|e| (e.english, e.english)).collect();

        Self { entries, by_korean, by_english }
    }

    /// The process-wide table of supported Korean cities.
    pub fn builtin() -> &'static CityTable {
        &BUILTIN
    }

    pub fn entries(&self) -> &'static [CityEntry] {
        self.entries
    }

    /// Exact-match resolution: Korean name first, then canonical English name.
    pub fn resolve(&self, input: &str) -> Resolution {
        let input = input.trim();

        let canonical = self
            .by_korean
            .get(input)
            .or_else(|| self.by_english.get(input))
            .copied();

        match canonical {
            Some(canonical) => Resolution::Resolved(CityQuery::new(canonical, input)),
            None => Resolution::Unresolved,
        }
    }

    /// Substring search for the "search" affordance.
    ///
    /// Matches Korean names containing `text`, or English names containing it
    /// case-insensitively. Results keep table order.
    pub fn search(&self, text: &str) -> Vec<&'static CityEntry> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let lower = text.to_lowercase();
        self.entries
            .iter()
            .filter(|e| e.korean.contains(text) || e.english.to_lowercase().contains(&lower))
            .collect()
    }

    /// `서울(Seoul), 부산(Busan), ...` for user-facing warnings.
    pub fn supported_list(&self) -> String {
        self.entries.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    }
}
