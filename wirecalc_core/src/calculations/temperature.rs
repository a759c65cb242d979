//! Temperature rating selection (NOM 110-14(c)).
//!
//! Terminations of circuits up to 100 A are rated 60 °C; above that, 75 °C.
//! Triangular tray arrangements have no 60 °C ampacity column and start
//! at 75 °C. An explicit override always wins.

use crate::conductors::TemperatureRating;
use crate::installation::RacewayMethod;
use crate::nom_factors::TERMINATION_THRESHOLD_A;
use crate::units::Amperes;

/// Pick the ampacity column for a circuit.
pub fn select_rating(
    nominal: Amperes,
    raceway: RacewayMethod,
    override_rating: Option<TemperatureRating>,
) -> TemperatureRating {
    if let Some(rating) = override_rating {
        return rating;
    }
    if nominal.0 > TERMINATION_THRESHOLD_A || !raceway.has_60c_column() {
        TemperatureRating::C75
    } else {
        TemperatureRating::C60
    }
}
