use argh::FromArgs;

/// Basketball shot analysis: detects shots from per-frame ball observations and reports shooting stats
#[derive(FromArgs, Debug)]
pub struct Args {
    /// recorded frame observations (JSON); a simulated session is analyzed when omitted
    #[argh(option)]
    pub observations: Option<String>,

    /// simulated video duration in seconds
    #[argh(option, default = "60.0")]
    pub duration: f64,

    /// seed for simulated detections, feedback and confidence
    #[argh(option)]
    pub seed: Option<u64>,

    /// samples analyzed per second of video
    #[argh(option, default = "1.0")]
    pub sample_rate: f64,

    /// detection backend device: gpu, cpu
    #[argh(option, default = "String::from(\"gpu\")")]
    pub device: String,

    /// shot detector: arc, curve-fit
    #[argh(option, default = "String::from(\"arc\")")]
    pub detector: String,

    /// number of recent shots shown in the summary
    #[argh(option, default = "5")]
    pub recent: usize,

    /// move the results JSON to this path
    #[argh(option, default = "String::new()")]
    pub output_filepath: String,

    /// use headless mode (no progress bar)
    #[argh(switch)]
    pub headless: bool,

    /// make the simulated accelerated backend fail to initialize
    #[argh(switch)]
    pub simulate_gpu_failure: bool,
}
