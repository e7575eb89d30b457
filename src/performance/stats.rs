//! Counters shown in the stats panel

/// One frame's worth of displayed statistics
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatsSnapshot {
    pub total: usize,
    pub active: usize,
    pub rendered: usize,
    pub backend_multiplier: u32,
    pub fps: f64,
    pub gpu_util: f64,
    pub elapsed: f64,
}

impl StatsSnapshot {
    /// Particles simulated across the primary set and every duplicate
    pub fn backend_total(&self) -> u64 {
        self.total as u64 * self.backend_multiplier as u64
    }

    /// Panel lines, top to bottom
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Active: {} / {}", format_count(self.active as u64), format_count(self.total as u64)),
            format!("Rendered: {}", format_count(self.rendered as u64)),
            format!(
                "Backend: {}x  Total: {}",
                self.backend_multiplier,
                format_count(self.backend_total())
            ),
            format!("FPS: {:.1}", self.fps),
            format!("GPU: {:.0}%", self.gpu_util),
            format!("Time: {:.1}s", self.elapsed),
        ]
    }
}

/// Formats an integer with `,` thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(100_000), "100,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_panel_lines() {
        let stats = StatsSnapshot {
            total: 12_000,
            active: 11_500,
            rendered: 2000,
            backend_multiplier: 10,
            fps: 59.94,
            gpu_util: 72.4,
            elapsed: 3.26,
        };
        assert_eq!(
            stats.lines(),
            vec![
                "Active: 11,500 / 12,000",
                "Rendered: 2,000",
                "Backend: 10x  Total: 120,000",
                "FPS: 59.9",
                "GPU: 72%",
                "Time: 3.3s",
            ]
        );
    }
}
