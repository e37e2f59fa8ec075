use crate::backend::BrokerConfig;
use crate::error::PublishError;
use crate::publisher::{DeliveryError, Publisher};
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::error::{KafkaError, RDKafkaErrorCode};
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::util::Timeout;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

const CLOSE_TIMEOUT: Duration = Duration::from_secs(10);
const QUEUE_FULL_BACKOFF: Duration = Duration::from_millis(100);

/// Kafka publisher that hands each encoded entry to an rdkafka producer.
///
/// `send` returns as soon as the message is queued in the producer and
/// waits for room while the producer's local queue is full, so a slow
/// broker holds up the dispatcher instead of losing entries. Delivery
/// reports are awaited in the background and failures are forwarded to
/// the [`errors`](Publisher::errors) stream.
pub struct KafkaPublisher {
    producer: FutureProducer,
    errors_tx: mpsc::Sender<DeliveryError>,
    errors_rx: Option<mpsc::Receiver<DeliveryError>>,
}

impl KafkaPublisher {
    /// Create a new Kafka publisher for the brokers in `config`.
    pub fn new(config: &BrokerConfig) -> Result<Self, PublishError> {
        if config.brokers.is_empty() {
            return Err(PublishError::Config("no kafka brokers provided".to_string()));
        }

        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("message.timeout.ms", "5000")
            .create()
            .map_err(|e| PublishError::Broker(Box::new(e)))?;

        let (errors_tx, errors_rx) = mpsc::channel(256);
        Ok(KafkaPublisher {
            producer,
            errors_tx,
            errors_rx: Some(errors_rx),
        })
    }
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn send(&self, topic: &str, payload: Vec<u8>) -> Result<(), PublishError> {
        let record = FutureRecord::<(), [u8]>::to(topic).payload(payload.as_slice());

        let delivery = enqueue_when_room(record, |record| self.producer.send_result(record))
            .await
            .map_err(|e| PublishError::Broker(Box::new(e)))?;

        let errors = self.errors_tx.clone();
        let topic = topic.to_string();
        tokio::spawn(async move {
            let source = match delivery.await {
                Ok(Ok(_)) => return,
                Ok(Err((e, _))) => PublishError::Broker(Box::new(e)),
                Err(_) => PublishError::Closed,
            };
            let _ = errors.send(DeliveryError { topic, source }).await;
        });

        Ok(())
    }

    fn errors(&mut self) -> Option<mpsc::Receiver<DeliveryError>> {
        self.errors_rx.take()
    }

    async fn close(&self) -> Result<(), PublishError> {
        let producer = self.producer.clone();
        tokio::task::spawn_blocking(move || producer.flush(Timeout::After(CLOSE_TIMEOUT)))
            .await
            .map_err(|e| PublishError::Broker(Box::new(e)))?
            .map_err(|e| PublishError::Broker(Box::new(e)))
    }
}

/// Offer `record` to `produce` until the producer's local queue has room.
///
/// Any error other than a full queue is returned as is.
async fn enqueue_when_room<R, T>(
    mut record: R,
    mut produce: impl FnMut(R) -> Result<T, (KafkaError, R)>,
) -> Result<T, KafkaError> {
    loop {
        match produce(record) {
            Ok(delivery) => return Ok(delivery),
            Err((KafkaError::MessageProduction(RDKafkaErrorCode::QueueFull), returned)) => {
                record = returned;
                sleep(QUEUE_FULL_BACKOFF).await;
            }
            Err((e, _)) => return Err(e),
        }
    }
}
