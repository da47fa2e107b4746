use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub bookings_created_total: IntCounterVec,
    pub booking_transitions_total: IntCounterVec,
    pub available_drivers: IntGauge,
    pub location_samples_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let bookings_created_total = IntCounterVec::new(
            Opts::new(
                "bookings_created_total",
                "Bookings created, by whether a driver was assigned",
            ),
            &["outcome"],
        )
        .expect("valid bookings_created_total metric");

        let booking_transitions_total = IntCounterVec::new(
            Opts::new("booking_transitions_total", "Booking status transitions by kind"),
            &["transition"],
        )
        .expect("valid booking_transitions_total metric");

        let available_drivers =
            IntGauge::new("available_drivers", "Drivers currently flagged available")
                .expect("valid available_drivers metric");

        let location_samples_total =
            IntCounter::new("location_samples_total", "Driver location samples recorded")
                .expect("valid location_samples_total metric");

        registry
            .register(Box::new(bookings_created_total.clone()))
            .expect("register bookings_created_total");
        registry
            .register(Box::new(booking_transitions_total.clone()))
            .expect("register booking_transitions_total");
        registry
            .register(Box::new(available_drivers.clone()))
            .expect("register available_drivers");
        registry
            .register(Box::new(location_samples_total.clone()))
            .expect("register location_samples_total");

        Self {
            registry,
            bookings_created_total,
            booking_transitions_total,
            available_drivers,
            location_samples_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
