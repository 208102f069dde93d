use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use vcfgeno_filter::FilterThresholds;

const PROMPTS: [&str; 4] = [
    "Maximum missing data for an individual: ",
    "Maximum missing data for a marker: ",
    "Maximum heterozygosity (inbred crop populations typically use 0.40): ",
    "Minimum minor allele frequency (inbred crop populations typically use 0.05): ",
];

///
/// Ask for the four thresholds, one per line, in cascade input order.
///
/// # Arguments
/// - input: where answers are read from
/// - output: where prompts are written to
///
pub fn prompt_for_thresholds<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
) -> Result<FilterThresholds> {
    let mut values = [0.0_f64; 4];

    for (value, prompt) in values.iter_mut().zip(PROMPTS) {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line)?;
        if read == 0 {
            anyhow::bail!("Input ended before all four thresholds were given");
        }

        *value = line
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Threshold must be a number, got {:?}", line.trim()))?;
    }

    Ok(FilterThresholds::try_from(values)?)
}
