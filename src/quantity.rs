//! Quantities as the vendor reports them.

use std::fmt::{Debug, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Energy delta or meter total in kilowatt-hours.
#[derive(Copy, Clone, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct KilowattHours(pub f64);

impl Display for KilowattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.3}kWh", self.0)
    }
}

/// Momentary power draw in watts.
#[derive(Copy, Clone, PartialEq, PartialOrd, Deserialize, Serialize)]
pub struct Watts(pub f64);

impl Display for Watts {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.0} W", self.0)
    }
}

impl Debug for Watts {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{:.0}W", self.0)
    }
}
