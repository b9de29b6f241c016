//! Single-trip reports.

use anyhow::Result;
use colored::Colorize;
use hos_engine::{CalculateTripResponse, DailyLog, DutyStatus, TripResult};
use std::io::Write;

pub fn write_console<W: Write + ?Sized>(out: &mut W, result: &TripResult) -> Result<()> {
    writeln!(out, "{}", "🚚 Trip Plan".bright_cyan().bold())?;
    writeln!(out, "{}", "============".cyan())?;
    writeln!(out, "Trip: {}", result.id)?;
    writeln!(out, "Route: {}", result.route.bold())?;
    writeln!(out, "Date: {}", result.date)?;
    writeln!(out, "Distance: {:.0} mi", result.total_distance)?;
    writeln!(
        out,
        "Driving: {:.1} h | On duty: {:.1} h | Elapsed: {:.1} h",
        result.total_driving_hours, result.total_on_duty_hours, result.total_trip_hours
    )?;
    writeln!(
        out,
        "Remaining cycle: {:.1} h",
        result.remaining_cycle_hours
    )?;
    if result.is_compliant {
        writeln!(out, "Compliance: {}", "✅ compliant".green())?;
    } else {
        writeln!(out, "Compliance: {}", "❌ not compliant".red())?;
        for message in result.issue_messages() {
            writeln!(out, "   • {}", message.yellow())?;
        }
    }
    writeln!(out)?;

    writeln!(out, "{}", "📍 Stops".bright_yellow().bold())?;
    for stop in &result.stops {
        writeln!(
            out,
            "  Day {} {}  {:<8} {:>6.0} mi  {} ({} min)",
            stop.day,
            stop.time,
            stop.kind.to_string(),
            stop.mileage,
            stop.location,
            stop.duration_minutes
        )?;
    }
    writeln!(out)?;

    for log in &result.daily_logs {
        write_console_log(out, log)?;
    }
    Ok(())
}

fn write_console_log<W: Write + ?Sized>(out: &mut W, log: &DailyLog) -> Result<()> {
    writeln!(
        out,
        "{}",
        format!("📝 Day {} - {}", log.day, log.date).bright_blue().bold()
    )?;
    writeln!(
        out,
        "   Driver: {} | Carrier: {} | Vehicle: {}",
        log.header.driver_name, log.header.carrier_name, log.header.vehicle_number
    )?;
    for (entry, start, end) in log.entry_spans() {
        writeln!(
            out,
            "   {start}-{end}  {:<9} {}{}",
            entry.status.to_string(),
            entry.location,
            entry
                .remarks
                .as_deref()
                .map(|r| format!(" ({r})"))
                .unwrap_or_default()
        )?;
    }
    writeln!(
        out,
        "   Totals: off {:.2} | sleeper {:.2} | driving {:.2} | on duty {:.2} | {:.0} mi",
        log.totals.off_duty,
        log.totals.sleeper_berth,
        log.totals.driving,
        log.totals.on_duty,
        log.total_miles
    )?;
    writeln!(out)?;
    Ok(())
}

pub fn write_json<W: Write + ?Sized>(out: &mut W, result: &TripResult) -> Result<()> {
    writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
    Ok(())
}

pub fn write_api<W: Write + ?Sized>(out: &mut W, result: &TripResult) -> Result<()> {
    let response = CalculateTripResponse::from_result(result);
    writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
    Ok(())
}

pub fn write_markdown<W: Write + ?Sized>(out: &mut W, result: &TripResult) -> Result<()> {
    writeln!(out, "# Trip {}\n", result.route)?;
    writeln!(out, "- **Trip id**: `{}`", result.id)?;
    writeln!(out, "- **Date**: {}", result.date)?;
    writeln!(out, "- **Distance**: {:.0} mi", result.total_distance)?;
    writeln!(out, "- **Driving**: {:.1} h", result.total_driving_hours)?;
    writeln!(out, "- **On duty**: {:.1} h", result.total_on_duty_hours)?;
    writeln!(out, "- **Remaining cycle**: {:.1} h", result.remaining_cycle_hours)?;
    writeln!(
        out,
        "- **Compliant**: {}\n",
        if result.is_compliant { "yes" } else { "no" }
    )?;
    for message in result.issue_messages() {
        writeln!(out, "> ⚠️ {message}")?;
    }
    if !result.compliance_issues.is_empty() {
        writeln!(out)?;
    }

    writeln!(out, "## Stops\n")?;
    writeln!(out, "| # | Day | Time | Kind | Location | Minutes | Mile |")?;
    writeln!(out, "|---|-----|------|------|----------|---------|------|")?;
    for (idx, stop) in result.stops.iter().enumerate() {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {:.0} |",
            idx + 1,
            stop.day,
            stop.time,
            stop.kind,
            stop.location,
            stop.duration_minutes,
            stop.mileage
        )?;
    }
    writeln!(out)?;

    for log in &result.daily_logs {
        writeln!(out, "## Day {} ({})\n", log.day, log.date)?;
        writeln!(out, "| From | To | Status | Location | Remarks |")?;
        writeln!(out, "|------|----|--------|----------|---------|")?;
        for (entry, start, end) in log.entry_spans() {
            writeln!(
                out,
                "| {start} | {end} | {} | {} | {} |",
                entry.status,
                entry.location,
                entry.remarks.as_deref().unwrap_or("")
            )?;
        }
        writeln!(out)?;
        for status in DutyStatus::ALL {
            writeln!(out, "- **{status}**: {:.2} h", log.totals.get(status))?;
        }
        writeln!(out, "- **Miles**: {:.0}\n", log.total_miles)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hos_engine::{FixedFallback, LegDistances, TableEstimator, TripPlanner, TripRequest};

    fn overnight() -> TripResult {
        let request = TripRequest::new("Amarillo, TX", "Tucson, AZ", "San Diego, CA", 5.0)
            .with_sleeper_berth(true);
        TripPlanner::new(TableEstimator::with_fallback(FixedFallback(100.0)))
            .plan_with_legs(
                &request,
                LegDistances::new(585.0, 400.0),
                NaiveDate::from_ymd_opt(2025, 10, 6).unwrap(),
            )
            .unwrap()
    }

    #[test]
    fn markdown_has_a_section_per_day() {
        let mut buf = Vec::new();
        write_markdown(&mut buf, &overnight()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("## Day 1 (2025-10-06)"));
        assert!(text.contains("## Day 2 (2025-10-07)"));
        assert!(text.contains("| 00:00 | 01:00 | sleeper |"));
        assert!(text.contains("- **Compliant**: no"));
    }

    #[test]
    fn api_report_matches_response_shape() {
        let mut buf = Vec::new();
        write_api(&mut buf, &overnight()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["eld_logs_needed"], 2);
        assert_eq!(value["rest_stops"], 2);
        assert!(value["message"].as_str().unwrap().contains("2 days needed"));
    }

    #[test]
    fn console_lists_every_stop() {
        colored::control::set_override(false);
        let result = overnight();
        let mut buf = Vec::new();
        write_console(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Route: Amarillo, TX → Tucson, AZ → San Diego, CA"));
        assert_eq!(text.matches(" mi  ").count(), result.stops.len());
        assert!(text.contains("Day 2 07:10  dropoff"));
    }
}
