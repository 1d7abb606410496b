use crate::model::KeyPath;
use futures::channel::mpsc::Sender;

pub type WatchTx = Sender<ChangeNotice>;

/// Emitted by a watch-capable source when its underlying data changed; the
/// loader reacts by re-materializing all sources.
#[derive(Clone, Debug)]
pub struct ChangeNotice {
    pub source_id: String,
    pub changed: Vec<KeyPath>,
    pub ts: i64,
}
