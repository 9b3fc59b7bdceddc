//! Plain-text rendering of a dashboard report.

use std::fmt;

use chrono::{Local, TimeZone};
use kweather_core::{
    CitySource, DailyForecast, DashboardReport, SectionError, TemperaturePoint, WeatherSnapshot,
    translate,
};

const BAR_WIDTH: usize = 30;

pub fn report(report: &DashboardReport) -> String {
    report_in(report, &Local)
}

pub fn report_in<Tz: TimeZone>(report: &DashboardReport, tz: &Tz) -> String
where
    Tz::Offset: fmt::Display,
{
    ReportView { report, tz }.to_string()
}

/// A report bound to the zone its times are shown in.
struct ReportView<'a, Tz> {
    report: &'a DashboardReport,
    tz: &'a Tz,
}

impl<Tz: TimeZone> fmt::Display for ReportView<'_, Tz>
where
    Tz::Offset: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;

        if report.source == CitySource::Detected {
            writeln!(f, "자동 감지된 도시: {} (Auto-detected city)", report.city.canonical)?;
        }
        writeln!(f, "== {} ==", report.city.canonical)?;

        for err in &report.errors {
            writeln!(f, "! {err}")?;
        }

        if let Some(current) = &report.current {
            current_section(f, current, self.tz)?;
        }

        if let Some(pm25) = report.pm25 {
            air_quality_section(f, pm25)?;
        }

        if let Some(daily) = &report.daily {
            daily_section(f, daily)?;
        }

        match &report.chart {
            Some(points) => chart_section(f, points),
            None if report.errors.contains(&SectionError::ForecastUnavailable) => {
                writeln!(f, "\n예보 데이터를 가져올 수 없습니다. (Unable to fetch forecast data.)")
            }
            None => Ok(()),
        }
    }
}

fn current_section<Tz: TimeZone>(
    f: &mut fmt::Formatter<'_>,
    current: &WeatherSnapshot,
    tz: &Tz,
) -> fmt::Result
where
    Tz::Offset: fmt::Display,
{
    writeln!(f, "\n현재 날씨 (Current Weather)")?;
    writeln!(f, "  온도 (Temperature): {}°C", current.temperature_c)?;
    writeln!(f, "  상태 (Condition): {} ({})", current.description, current.main)?;
    writeln!(f, "  습도 (Humidity): {}%", current.humidity_pct)?;
    writeln!(f, "  풍속 (Wind Speed): {} m/s", current.wind_speed_mps)?;
    writeln!(f, "  일출 (Sunrise): {}", current.sunrise_hhmm(tz))?;
    writeln!(f, "  일몰 (Sunset): {}", current.sunset_hhmm(tz))
}

fn air_quality_section(f: &mut fmt::Formatter<'_>, pm25: f64) -> fmt::Result {
    writeln!(f, "\n대기질 (Air Quality)")?;
    writeln!(f, "  미세먼지 PM2.5: {pm25} µg/m³")
}

fn daily_section(f: &mut fmt::Formatter<'_>, daily: &[DailyForecast]) -> fmt::Result {
    writeln!(f, "\n주간 예보 (Weekly Forecast)")?;
    for day in daily {
        let desc = &day.entry.description;
        writeln!(
            f,
            "  {} ({}): {}°C, {} ({})",
            day.date.format("%m/%d"),
            day.weekday,
            day.entry.temperature_c,
            translate::to_korean(desc),
            desc,
        )?;
    }
    Ok(())
}

/// Horizontal bars scaled between the lowest and highest temperature.
fn chart_section(f: &mut fmt::Formatter<'_>, points: &[TemperaturePoint]) -> fmt::Result {
    writeln!(f, "\n앞으로의 온도 변화 (Upcoming Temperature Changes)")?;

    let min = points.iter().map(|p| p.temperature_c).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.temperature_c).fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    for p in points {
        let ratio = if span > 0.0 { (p.temperature_c - min) / span } else { 1.0 };
        let len = 1 + (ratio * (BAR_WIDTH - 1) as f64).round() as usize;
        writeln!(f, "  {} {:>6.1}°C {}", p.label, p.temperature_c, "#".repeat(len))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, NaiveDate, Utc};
    use kweather_core::{CityQuery, ForecastEntry};

    fn sample_report() -> DashboardReport {
        let ts = DateTime::<Utc>::from_timestamp(1_714_595_400, 0).unwrap();
        let entry = ForecastEntry { timestamp: ts, temperature_c: 18.0, description: "clear sky".into() };

        DashboardReport {
            city: CityQuery::new("Seoul", "서울"),
            source: CitySource::Input,
            current: Some(WeatherSnapshot {
                temperature_c: 21.4,
                humidity_pct: 48,
                wind_speed_mps: 2.57,
                description: "맑음".into(),
                main: "Clear".into(),
                sunrise: ts,
                sunset: ts,
            }),
            pm25: Some(17.3),
            daily: Some(vec![DailyForecast {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                weekday: "Wednesday".into(),
                entry,
            }]),
            chart: Some(vec![
                TemperaturePoint { label: "05/01 20:30".into(), temperature_c: 10.0 },
                TemperaturePoint { label: "05/01 23:30".into(), temperature_c: 20.0 },
            ]),
            errors: Vec::new(),
        }
    }

    #[test]
    fn renders_every_section() {
        let text = report_in(&sample_report(), &Utc);

        assert!(text.contains("== Seoul =="));
        assert!(text.contains("온도 (Temperature): 21.4°C"));
        assert!(text.contains("상태 (Condition): 맑음 (Clear)"));
        assert!(text.contains("일출 (Sunrise): 20:30"));
        assert!(text.contains("PM2.5: 17.3"));
        assert!(text.contains("05/01 (Wednesday): 18°C, 맑은 하늘 (clear sky)"));
        assert!(text.contains(&format!("05/01 23:30   20.0°C {}", "#".repeat(BAR_WIDTH))));
        assert!(text.contains("05/01 20:30   10.0°C #\n"));
    }

    #[test]
    fn failed_sections_show_errors_only() {
        let mut report = sample_report();
        report.current = None;
        report.daily = None;
        report.chart = None;
        report.errors = vec![SectionError::CurrentUnavailable, SectionError::ForecastUnavailable];

        let text = report_in(&report, &Utc);

        assert!(text.contains("Unable to load current weather"));
        assert!(text.contains("Unable to fetch forecast data"));
        assert!(!text.contains("현재 날씨 (Current Weather)"));
        assert!(!text.contains("주간 예보 (Weekly Forecast)"));
    }

    #[test]
    fn air_quality_renders_without_current_weather() {
        let mut report = sample_report();
        report.current = None;
        report.daily = None;
        report.chart = None;
        report.errors = vec![SectionError::CurrentUnavailable, SectionError::ForecastUnavailable];

        let text = report_in(&report, &Utc);

        assert!(text.contains("대기질 (Air Quality)"));
        assert!(text.contains("미세먼지 PM2.5: 17.3 µg/m³"));
        assert!(!text.contains("현재 날씨 (Current Weather)"));
    }

    #[test]
    fn missing_air_quality_shows_only_the_error() {
        let mut report = sample_report();
        report.pm25 = None;
        report.errors = vec![SectionError::AirQualityUnavailable];

        let text = report_in(&report, &Utc);

        assert!(text.contains("Air quality data unavailable"));
        assert!(!text.contains("대기질 (Air Quality)"));
        assert!(text.contains("현재 날씨 (Current Weather)"));
    }
}
