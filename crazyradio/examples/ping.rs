use anyhow::Result;
use crazyradio::DataRate;

fn main() -> Result<()> {
    let mut radio = crazyradio::open_crazyradio()?;

    // Talk to a device on channel 80 at 250 kbps, waiting up to 1 ms between
    // retries.
    radio.set_channel(80)?;
    radio.set_data_rate(DataRate::Rate250K)?;
    radio.set_ard_time(1000)?;
    radio.set_arc(10)?;

    // Send null packets and count how many make it through.
    let mut acked = 0;
    let mut retries = 0;
    for _ in 0..100 {
        if let Some(ack) = radio.send_packet(&[0xff])? {
            if ack.acknowledged {
                acked += 1;
            }
            retries += ack.retry_count as u32;
        }
    }

    radio.close()?;
    println!("{acked}/100 packets acknowledged, {retries} retries total");
    Ok(())
}
