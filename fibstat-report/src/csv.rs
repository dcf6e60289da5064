//! CSV Output

use crate::report::Report;

const HEADER: &str = "id,group,variant,input,status,samples,iterations,mean_ns,median_ns,std_dev_ns,min_ns,max_ns,p50_ns,p90_ns,p99_ns,outliers,speedup,error";

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// One row per benchmark. Timing columns are empty when a benchmark has no metrics.
pub fn generate_csv_report(report: &Report) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    for result in &report.results {
        let speedup = report
            .comparisons
            .iter()
            .flat_map(|c| c.entries.iter())
            .find(|e| e.benchmark_id == result.id)
            .map(|e| format!("{:.4}", e.speedup))
            .unwrap_or_default();

        let status = format!("{:?}", result.status).to_lowercase();
        let mut fields = vec![
            escape(&result.id),
            escape(&result.group),
            escape(&result.variant),
            escape(&result.input),
            status,
        ];

        match &result.metrics {
            Some(m) => {
                fields.push(m.samples.to_string());
                fields.push(m.iterations.to_string());
                for value in [
                    m.mean_ns,
                    m.median_ns,
                    m.std_dev_ns,
                    m.min_ns,
                    m.max_ns,
                    m.p50_ns,
                    m.p90_ns,
                    m.p99_ns,
                ] {
                    fields.push(format!("{:.3}", value));
                }
                fields.push(m.outliers.to_string());
            }
            None => fields.extend(std::iter::repeat_n(String::new(), 11)),
        }

        fields.push(speedup);
        fields.push(
            result
                .failure
                .as_ref()
                .map(|f| escape(&f.message))
                .unwrap_or_default(),
        );

        out.push_str(&fields.join(","));
        out.push('\n');
    }

    out
}
