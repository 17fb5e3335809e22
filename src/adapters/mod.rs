//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements                         | Connects to           |
//! |------------|------------------------------------|-----------------------|
//! | `hardware` | SensorPort, ActuatorPort,          | ADC, GPIO, LEDC,      |
//! |            | PowerPort, DelayNs                 | light sleep           |
//! | `lcd`      | DisplayPort                        | 20x4 HD44780 over I2C |
//! | `log_sink` | EventSink                          | Serial log output     |
//! | `rng`      | RandomPort                         | esp_random seed       |

pub mod hardware;
pub mod lcd;
pub mod log_sink;
pub mod rng;
