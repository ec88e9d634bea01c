//! Calendar domain — the heartbeat of the simulation.
//!
//! Responsible for:
//! - Advancing the date (days, seasons, years) when a DayEndEvent arrives
//! - Rolling the new day's weather
//! - Sending SeasonChangeEvent
//! - Ordering the night: `DayCycleSet` is chained here

use bevy::prelude::*;
use rand::Rng;

use crate::shared::*;

pub struct CalendarPlugin;

impl Plugin for CalendarPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Calendar>()
            .init_resource::<SimRng>()
            .add_event::<DayEndEvent>()
            .add_event::<SeasonChangeEvent>()
            .configure_sets(
                Update,
                (
                    DayCycleSet::Calendar,
                    DayCycleSet::DayUpdate,
                    DayCycleSet::AnnounceSave,
                    DayCycleSet::BeforeSave,
                    DayCycleSet::CommitSave,
                    DayCycleSet::Wake,
                    DayCycleSet::Warped,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                process_day_end
                    .in_set(DayCycleSet::Calendar)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

// ─── Day-end ──────────────────────────────────────────────────────────────────

/// Moves the calendar to the morning after each DayEndEvent. Everything later
/// in the night reads the new date.
fn process_day_end(
    mut day_end_reader: EventReader<DayEndEvent>,
    mut season_writer: EventWriter<SeasonChangeEvent>,
    mut calendar: ResMut<Calendar>,
    mut rng: ResMut<SimRng>,
) {
    for event in day_end_reader.read() {
        info!(
            "[Calendar] Day ended — Day {} {:?} Year {}",
            event.day, event.season, event.year
        );
        if event.day != calendar.day || event.season != calendar.season || event.year != calendar.year {
            warn!(
                "[Calendar] DayEndEvent for Day {} {:?} Year {} but calendar is on Day {} {:?} Year {}",
                event.day, event.season, event.year, calendar.day, calendar.season, calendar.year
            );
        }

        if let Some(new_season) = advance_day(&mut calendar, &mut rng.0) {
            season_writer.send(SeasonChangeEvent {
                new_season,
                year: calendar.year,
            });
        }

        info!(
            "[Calendar] New day: Day {} {:?} Year {} — Weather: {:?}",
            calendar.day, calendar.season, calendar.year, calendar.weather
        );
    }
}

/// Advances to the next day, rolling season and year over as needed, and
/// rolls the new day's weather. Returns the new season if it changed.
pub fn advance_day(calendar: &mut Calendar, rng: &mut impl Rng) -> Option<Season> {
    calendar.day += 1;
    let mut season_changed = None;

    if calendar.day > DAYS_PER_SEASON {
        calendar.day = 1;
        let old_season = calendar.season;
        calendar.season = calendar.season.next();
        season_changed = Some(calendar.season);

        info!(
            "[Calendar] Season changed: {:?} -> {:?} (Year {})",
            old_season, calendar.season, calendar.year
        );

        // Year rollover happens when Spring begins again
        if calendar.season == Season::Spring {
            calendar.year += 1;
            info!("[Calendar] New Year! Year {}", calendar.year);
        }
    }

    calendar.weather = roll_weather(calendar.season, rng);
    season_changed
}

// ─── Weather rolling ──────────────────────────────────────────────────────────

/// Rolls a weather result for the given season using weighted probabilities.
///
/// Spring:  60% Sunny, 30% Rainy, 10% Stormy
/// Summer:  70% Sunny, 20% Rainy, 10% Stormy
/// Fall:    50% Sunny, 35% Rainy, 15% Stormy
/// Winter:  60% Sunny, 40% Snowy
pub fn roll_weather(season: Season, rng: &mut impl Rng) -> Weather {
    let roll: f32 = rng.gen(); // 0.0 ..< 1.0

    match season {
        Season::Spring => {
            if roll < 0.60 {
                Weather::Sunny
            } else if roll < 0.90 {
                Weather::Rainy
            } else {
                Weather::Stormy
            }
        }
        Season::Summer => {
            if roll < 0.70 {
                Weather::Sunny
            } else if roll < 0.90 {
                Weather::Rainy
            } else {
                Weather::Stormy
            }
        }
        Season::Fall => {
            if roll < 0.50 {
                Weather::Sunny
            } else if roll < 0.85 {
                Weather::Rainy
            } else {
                Weather::Stormy
            }
        }
        Season::Winter => {
            if roll < 0.60 {
                Weather::Sunny
            } else {
                Weather::Snowy
            }
        }
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
