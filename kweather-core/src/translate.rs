//! English to Korean translation of OpenWeather condition descriptions.

const CONDITIONS: &[(&str, &str)] = &[
    ("clear sky", "맑은 하늘"),
    ("few clouds", "구름 조금"),
    ("scattered clouds", "흩어진 구름"),
    ("broken clouds", "구름 많음"),
    ("shower rain", "소나기"),
    ("rain", "비"),
    ("thunderstorm", "천둥번개"),
    ("snow", "눈"),
    ("mist", "안개"),
];

/// Korean label for a provider description; unknown descriptions pass through.
pub fn to_korean(description: &str) -> &str {
    CONDITIONS
        .iter()
        .find(|(en, _)| *en == description)
        .map(|(_, ko)| *ko)
        .unwrap_or(description)
}
