pub struct Icons;

impl Icons {
    pub const FLASK: &str = "⚗️";
    pub const CHECK: &str = "✅";
    pub const CROSS: &str = "❌";
    pub const DATABASE: &str = "🗄️";
    pub const DATASET: &str = "📄";
    pub const TRASH: &str = "🗑️";
    pub const LINK: &str = "🔗";
    pub const STATS: &str = "📊";
    pub const GEAR: &str = "⚙️";
}
